/// Hierarchy of an analysis run as shown on the console

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingLevel {
    Root,   // one analysis request
    Stage,  // routing decision, strategy attempts, completion
    Step,   // staging, sending, cleanup
    Detail, // everything else
}

/// Determines the processing level of a log message based on its content
pub fn determine_processing_level(message: &str) -> ProcessingLevel {
    if message.starts_with("Analyzing input") {
        return ProcessingLevel::Root;
    }

    if message.starts_with("Selected strategy")
        || message.starts_with("Trying strategy")
        || message.starts_with("Trying fallback strategy")
        || message.starts_with("Analysis completed")
        || message.starts_with("All strategies failed")
        || message.contains("STRATEGY FAILED")
    {
        return ProcessingLevel::Stage;
    }

    if message.starts_with("Staged ")
        || message.starts_with("Encoding ")
        || message.starts_with("Sending request")
        || message.starts_with("Received response")
        || message.starts_with("Removed scratch")
    {
        return ProcessingLevel::Step;
    }

    ProcessingLevel::Detail
}
