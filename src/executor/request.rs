use serde::{Deserialize, Serialize};

pub const VIDEO_DATA_URI_PREFIX: &str = "data:video/mp4;base64,";

/// Body of a chat-completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: MessageContent,
}

/// Plain text for text chat, typed parts for multimodal turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    VideoUrl { video_url: MediaUrl },
    ImageUrl { image_url: MediaUrl },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaUrl {
    pub url: String,
}

impl ChatRequest {
    /// A single user turn: the video first, then the question.
    pub fn video(model: &str, video_url: String, question: &str) -> Self {
        Self::user(
            model,
            MessageContent::Parts(vec![
                ContentPart::VideoUrl {
                    video_url: MediaUrl { url: video_url },
                },
                ContentPart::Text {
                    text: question.to_string(),
                },
            ]),
        )
    }

    pub fn image(model: &str, image_url: &str, question: &str) -> Self {
        Self::user(
            model,
            MessageContent::Parts(vec![
                ContentPart::ImageUrl {
                    image_url: MediaUrl {
                        url: image_url.to_string(),
                    },
                },
                ContentPart::Text {
                    text: question.to_string(),
                },
            ]),
        )
    }

    /// Text-only chat; the content is a bare string on the wire.
    pub fn text(model: &str, prompt: &str) -> Self {
        Self::user(model, MessageContent::Text(prompt.to_string()))
    }

    fn user(model: &str, content: MessageContent) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatTurn {
                role: "user".to_string(),
                content,
            }],
        }
    }

    fn parts(&self) -> impl Iterator<Item = &ContentPart> {
        self.messages
            .iter()
            .filter_map(|turn| match &turn.content {
                MessageContent::Parts(parts) => Some(parts),
                MessageContent::Text(_) => None,
            })
            .flatten()
    }

    pub fn video_url(&self) -> Option<&str> {
        self.parts().find_map(|part| match part {
            ContentPart::VideoUrl { video_url } => Some(video_url.url.as_str()),
            _ => None,
        })
    }

    pub fn image_url(&self) -> Option<&str> {
        self.parts().find_map(|part| match part {
            ContentPart::ImageUrl { image_url } => Some(image_url.url.as_str()),
            _ => None,
        })
    }

    /// The text part of a multimodal turn.
    pub fn question(&self) -> Option<&str> {
        self.parts().find_map(|part| match part {
            ContentPart::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// The content of a text-only turn.
    pub fn prompt(&self) -> Option<&str> {
        self.messages.iter().find_map(|turn| match &turn.content {
            MessageContent::Text(text) => Some(text.as_str()),
            MessageContent::Parts(_) => None,
        })
    }
}

/// `data:video/mp4;base64,<payload>`; the API accepts every container under this type.
pub fn video_data_uri(encoded: &str) -> String {
    format!("{}{}", VIDEO_DATA_URI_PREFIX, encoded)
}
