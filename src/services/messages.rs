use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

const PROFILE_PHOTO_FRAMING: &str = "I'm providing a photo of myself. Please analyze my body type, proportions, and overall appearance to recommend clothing that would be flattering for my physique.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged turn sent to the completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

/// Content is either plain text or a list of typed parts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user turn carrying a single inline image
    pub fn image(bytes: &[u8]) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: data_uri(bytes),
                },
            }]),
        }
    }

    pub fn has_image(&self) -> bool {
        match &self.content {
            MessageContent::Text(_) => false,
            MessageContent::Parts(parts) => parts
                .iter()
                .any(|part| matches!(part, ContentPart::ImageUrl { .. })),
        }
    }
}

/// Encodes image bytes as a `data:` URI, sniffing the MIME type from the content
pub fn data_uri(bytes: &[u8]) -> String {
    let mime = infer::get(bytes)
        .map(|kind| kind.mime_type())
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or(DEFAULT_IMAGE_MIME);
    format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Messages ready for the completion endpoint plus how many images they carry
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRequest {
    pub messages: Vec<ChatMessage>,
    pub image_count: usize,
}

impl AssembledRequest {
    pub fn has_attachments(&self) -> bool {
        self.image_count > 0
    }
}

/// Builds the message list for one completion call
///
/// Order: system turn, prompt turn, then each non-empty image batch preceded by
/// its framing turn. Profile photos always come before aesthetic photos.
pub fn assemble(
    system_prompt: &str,
    prompt: &str,
    profile_images: &[Vec<u8>],
    aesthetic_images: &[Vec<u8>],
) -> AssembledRequest {
    let mut messages = vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)];

    if !profile_images.is_empty() {
        messages.push(ChatMessage::user(PROFILE_PHOTO_FRAMING));
        messages.extend(profile_images.iter().map(|bytes| ChatMessage::image(bytes)));
    }

    if !aesthetic_images.is_empty() {
        messages.push(ChatMessage::user(aesthetic_framing(aesthetic_images.len())));
        messages.extend(aesthetic_images.iter().map(|bytes| ChatMessage::image(bytes)));
    }

    AssembledRequest {
        messages,
        image_count: profile_images.len() + aesthetic_images.len(),
    }
}

fn aesthetic_framing(count: usize) -> String {
    format!(
        "I'm also providing {} photo(s) of fashion styles I like. Please analyze these images carefully and consider their colors, patterns, textures, silhouettes, and overall aesthetic.",
        count
    )
}
