use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(name = "zai-video")]
#[command(about = "Strategy-routed video analysis against a multimodal chat-completion API")]
#[command(long_about = "
Analyzes a hosted video URL or a local video file with a multimodal model.
The input decides how the video is sent: URLs are passed by reference, small
and medium local files are inlined as base64, and files too large to inline
are rejected with upload instructions. Failed inline calls fall back to the
next strategy when auto-fallback is enabled.

EXAMPLES:
  # Analyze a hosted video
  zai-video analyze https://cdn.example.com/clip.mp4

  # Ask a specific question about a local file
  zai-video analyze ./clip.mp4 -q \"Extract all on-screen text\"

  # Emit the raw result envelope as JSON
  zai-video analyze ./clip.mp4 --json

  # Ask about an image, or chat without media
  zai-video image https://cdn.example.com/cat.png -q \"What breed is this?\"
  zai-video chat \"Write a haiku about rain\" --model glm-4-plus

  # Check credentials and the environment
  zai-video check

  # Prefer URL input from now on
  zai-video config set-strategy url_first
")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding api_config.json and user_preferences.json
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a video URL or local video file
    Analyze(AnalyzeArgs),

    /// Ask a question about an image URL
    Image(ImageArgs),

    /// Text-only chat with the API
    Chat(ChatArgs),

    /// Validate credentials, preferences and the scratch directory
    Check,

    /// Show or change configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Show how the strategies compare
    Compare,

    /// Print version information
    Version,
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Video URL or path to a local video file
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Question to ask about the video
    #[arg(short, long, value_name = "TEXT")]
    pub question: Option<String>,

    /// Do not print the execution plan before the call
    #[arg(long)]
    pub no_plan: bool,

    /// Do not fall back to another strategy when the call fails
    #[arg(long)]
    pub no_fallback: bool,

    /// Print the result envelope as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct ImageArgs {
    /// Image URL or data:image URI
    #[arg(value_name = "IMAGE_URL")]
    pub image_url: String,

    /// Question to ask about the image
    #[arg(short, long, value_name = "TEXT")]
    pub question: Option<String>,

    /// Print the result envelope as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct ChatArgs {
    /// Prompt text
    #[arg(value_name = "PROMPT")]
    pub prompt: String,

    /// Text model (defaults to glm-4)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Print the result envelope as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the current configuration
    Show,

    /// Set the default strategy preference
    SetStrategy {
        #[arg(value_parser = ["auto", "url_first", "base64_only"])]
        strategy: String,
    },

    /// Set a single preference value
    Set {
        /// One of: default_strategy, auto_fallback, max_file_size_mb,
        /// warn_large_file, prefer_url, strategy_order
        key: String,
        value: String,
    },

    /// Restore default preferences
    Reset,
}

impl CliArgs {
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }

    pub fn show_timestamps(&self) -> bool {
        self.verbose || self.debug
    }

    pub fn should_use_color(&self) -> bool {
        !self.no_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let args = CliArgs::try_parse_from([
            "zai-video",
            "analyze",
            "clip.mp4",
            "-q",
            "What happens?",
            "--no-fallback",
            "--json",
            "--config-dir",
            "/tmp/zai",
        ])
        .unwrap();

        let Command::Analyze(analyze) = &args.command else {
            panic!("expected analyze");
        };
        assert_eq!(analyze.input, "clip.mp4");
        assert_eq!(analyze.question.as_deref(), Some("What happens?"));
        assert!(analyze.no_fallback);
        assert!(analyze.json);
        assert!(!analyze.no_plan);
        assert_eq!(args.config_dir, Some(PathBuf::from("/tmp/zai")));
    }

    #[test]
    fn test_parse_config_commands() {
        let args =
            CliArgs::try_parse_from(["zai-video", "config", "set-strategy", "url_first"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Config(ConfigCommand::SetStrategy { ref strategy }) if strategy == "url_first"
        ));

        let args =
            CliArgs::try_parse_from(["zai-video", "config", "set", "auto_fallback", "false"])
                .unwrap();
        assert!(matches!(
            args.command,
            Command::Config(ConfigCommand::Set { ref key, ref value })
                if key == "auto_fallback" && value == "false"
        ));

        assert!(CliArgs::try_parse_from(["zai-video", "config", "set-strategy", "fastest"]).is_err());
    }

    #[test]
    fn test_parse_image_and_chat() {
        let args = CliArgs::try_parse_from([
            "zai-video",
            "image",
            "https://cdn.example.com/cat.png",
            "-q",
            "What breed?",
        ])
        .unwrap();
        let Command::Image(image) = &args.command else {
            panic!("expected image");
        };
        assert_eq!(image.image_url, "https://cdn.example.com/cat.png");
        assert_eq!(image.question.as_deref(), Some("What breed?"));
        assert!(!image.json);

        let args =
            CliArgs::try_parse_from(["zai-video", "chat", "hello", "-m", "glm-4-plus", "--json"])
                .unwrap();
        let Command::Chat(chat) = &args.command else {
            panic!("expected chat");
        };
        assert_eq!(chat.prompt, "hello");
        assert_eq!(chat.model.as_deref(), Some("glm-4-plus"));
        assert!(chat.json);
    }

    #[test]
    fn test_log_level() {
        let args = CliArgs::try_parse_from(["zai-video", "check"]).unwrap();
        assert_eq!(args.log_level(), "warn");
        assert!(!args.show_timestamps());

        let args = CliArgs::try_parse_from(["zai-video", "--debug", "check"]).unwrap();
        assert_eq!(args.log_level(), "debug");

        let args = CliArgs::try_parse_from(["zai-video", "compare", "-v"]).unwrap();
        assert_eq!(args.log_level(), "info");
        assert!(args.should_use_color());
    }
}
