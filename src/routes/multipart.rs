use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    routes::extract::Multipart,
    storage::ImageUpload,
};

/// Text fields and the single file part named `file_field` of a multipart body.
#[derive(Debug, Default)]
pub struct FormParts {
    pub fields: HashMap<String, String>,
    pub file: Option<ImageUpload>,
}

pub async fn read_form(Multipart(mut multipart): Multipart, file_field: &str) -> AppResult<FormParts> {
    let mut parts = FormParts::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == file_field {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
            if file_name.is_empty() && content.is_empty() {
                continue;
            }
            parts.file = Some(ImageUpload::new(file_name, content.to_vec()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid form field {name}: {e}")))?;
            parts.fields.insert(name, value);
        }
    }

    Ok(parts)
}
