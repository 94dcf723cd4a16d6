//! Multipart form intake
//!
//! Photos are written into a per-request temporary directory. The directory guard lives
//! in [`UploadedForm`], so every file is removed when the form is dropped, whether the
//! request succeeded or not.
use axum::extract::{multipart::MultipartError, Multipart};
use axum::http::StatusCode;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Budget, UserPreferences},
};

/// Per-file upload limit
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    StyleDescription,
    AdditionalInfo,
    SkinTone,
    Gender,
    Expression,
    Budget,
    IncludeImage,
    ProfilePhoto,
    AestheticPhoto,
    Ignored,
}

fn classify(name: &str) -> FieldKind {
    match name {
        "style_description" => FieldKind::StyleDescription,
        "additional_info" => FieldKind::AdditionalInfo,
        "skin_color" | "skin_tone" => FieldKind::SkinTone,
        "gender" => FieldKind::Gender,
        "expression" => FieldKind::Expression,
        "price_range" | "budget" => FieldKind::Budget,
        "include_image" => FieldKind::IncludeImage,
        n if n.starts_with("user_photos") || n.starts_with("profile_photo") => {
            FieldKind::ProfilePhoto
        }
        n if n.starts_with("aesthetic_photos") || n.starts_with("inspiration_images") => {
            FieldKind::AestheticPhoto
        }
        _ => FieldKind::Ignored,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// A parsed upload; holds the temporary directory alive until dropped
#[derive(Debug)]
pub struct UploadedForm {
    pub preferences: UserPreferences,
    pub include_image: bool,
    workspace: TempDir,
}

impl UploadedForm {
    pub fn workspace(&self) -> &Path {
        self.workspace.path()
    }
}

#[derive(Debug, Default)]
struct TextFields {
    style_description: Option<String>,
    additional_info: Option<String>,
    skin_tone: Option<String>,
    gender: Option<String>,
    expression: Option<String>,
    budget: Option<String>,
    include_image: bool,
}

impl TextFields {
    fn set(&mut self, kind: FieldKind, value: String) {
        match kind {
            FieldKind::StyleDescription => self.style_description = Some(value),
            FieldKind::AdditionalInfo => self.additional_info = Some(value),
            FieldKind::SkinTone => self.skin_tone = Some(value),
            FieldKind::Gender => self.gender = Some(value),
            FieldKind::Expression => self.expression = Some(value),
            FieldKind::Budget => self.budget = Some(value),
            FieldKind::IncludeImage => self.include_image = parse_flag(&value),
            _ => {}
        }
    }

    fn into_preferences(self, profile: Vec<PathBuf>, aesthetic: Vec<PathBuf>) -> UserPreferences {
        let style = [self.style_description, self.additional_info]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let budget = self
            .budget
            .as_deref()
            .map(Budget::from_label)
            .unwrap_or_default();

        UserPreferences::new(
            Some(style),
            self.skin_tone,
            self.gender,
            self.expression,
            budget,
        )
        .with_photos(profile, aesthetic)
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::InvalidInput(format!("Malformed multipart body: {}", e.body_text()))
    }
}

async fn store_photo(dir: &Path, bytes: &[u8]) -> AppResult<PathBuf> {
    let extension = infer::get(bytes)
        .map(|kind| kind.extension())
        .unwrap_or("jpg");
    let path = dir.join(format!("{}.{}", Uuid::new_v4(), extension));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Reads the whole multipart body into preferences and stored photo files
pub async fn read_form(mut multipart: Multipart, temp_root: &Path) -> AppResult<UploadedForm> {
    tokio::fs::create_dir_all(temp_root).await?;
    let workspace = tempfile::Builder::new()
        .prefix("upload-")
        .tempdir_in(temp_root)?;

    let mut text = TextFields::default();
    let mut profile = Vec::new();
    let mut aesthetic = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let kind = classify(&name);

        match kind {
            FieldKind::Ignored => {
                tracing::debug!(field = %name, "Ignoring unknown form field");
            }
            FieldKind::ProfilePhoto | FieldKind::AestheticPhoto => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.is_empty() {
                    continue;
                }
                if bytes.len() > MAX_PHOTO_BYTES {
                    return Err(AppError::PayloadTooLarge(format!(
                        "Photo '{}' exceeds the {} MB limit",
                        name,
                        MAX_PHOTO_BYTES / 1024 / 1024
                    )));
                }

                let path = store_photo(workspace.path(), &bytes).await?;
                if kind == FieldKind::ProfilePhoto {
                    profile.push(path);
                } else {
                    aesthetic.push(path);
                }
            }
            _ => {
                let value = field.text().await.map_err(multipart_error)?;
                text.set(kind, value);
            }
        }
    }

    tracing::info!(
        profile_photos = profile.len(),
        aesthetic_photos = aesthetic.len(),
        "Upload stored"
    );

    let include_image = text.include_image;
    Ok(UploadedForm {
        preferences: text.into_preferences(profile, aesthetic),
        include_image,
        workspace,
    })
}
