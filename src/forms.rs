// forms.rs - multipart form submissions from the HTML surface

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::services::{CategoryInput, ItemInput};
use crate::storage::Upload;
use crate::views::PageError;

/// File inputs that carry a picture
const PICTURE_FIELDS: [&str; 2] = ["category-pic", "profile-pic"];

#[derive(Debug, Default)]
pub struct FormSubmission {
    pub fields: HashMap<String, String>,
    pub upload: Option<Upload>,
}

impl FormSubmission {
    pub async fn read(mut multipart: Multipart) -> Result<Self, PageError> {
        let mut form = FormSubmission::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let name = field.name().unwrap_or_default().to_string();

            if PICTURE_FIELDS.contains(&name.as_str()) {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(bad_form)?;
                // Browsers send an empty part when no file was chosen
                if !file_name.is_empty() {
                    form.upload = Some(Upload::new(file_name, bytes));
                }
                continue;
            }

            let value = field.text().await.map_err(bad_form)?;
            form.fields.insert(name, value);
        }

        Ok(form)
    }

    pub fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    pub fn category_input(&self) -> CategoryInput {
        CategoryInput {
            name: self.field("name"),
            description: self.field("description"),
        }
    }

    pub fn item_input(&self) -> Result<ItemInput, PageError> {
        let category_id = match self.fields.get("category-id").map(|v| v.trim()) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                PageError::BadRequest(format!("'{}' is not a valid category", raw))
            })?),
        };

        Ok(ItemInput {
            name: self.field("name"),
            price: self.field("price"),
            description: self.field("description"),
            category_id,
        })
    }
}

fn bad_form(err: axum::extract::multipart::MultipartError) -> PageError {
    tracing::warn!("Malformed form submission: {}", err);
    PageError::BadRequest("The submitted form could not be read".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormSubmission {
        FormSubmission {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            upload: None,
        }
    }

    #[test]
    fn item_input_parses_category() {
        let input = form(&[("name", "Ball"), ("price", "9.99"), ("category-id", " 3 ")])
            .item_input()
            .unwrap();
        assert_eq!(input.name.as_deref(), Some("Ball"));
        assert_eq!(input.price.as_deref(), Some("9.99"));
        assert_eq!(input.category_id, Some(3));
    }

    #[test]
    fn blank_category_is_missing_and_garbage_is_rejected() {
        assert_eq!(form(&[("category-id", "")]).item_input().unwrap().category_id, None);
        assert!(matches!(
            form(&[("category-id", "abc")]).item_input(),
            Err(PageError::BadRequest(_))
        ));
    }
}
