//! Drops chatty HTTP client internals from console output

/// Returns true if the message should be displayed, false if it is noise
pub fn should_show_message(message: &str) -> bool {
    // hyper / reqwest connection bookkeeping surfaced at debug level
    let noise_patterns = [
        "starting new connection",
        "connecting to",
        "connected to",
        "pooling idle connection",
        "reuse idle connection",
        "idle interval checking",
        "flushed ",
        "parsed ",
        "signal: Closed",
        "Conn::read_head",
        "client connection error",
    ];

    !noise_patterns
        .iter()
        .any(|pattern| message.contains(pattern))
}
