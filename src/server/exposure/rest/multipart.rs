//! Multipart form decoding for the vendor signup and venue forms

use crate::core::api::{Upload, VendorSignup, VenueForm};
use crate::core::error::{FieldValidationError, MarketplaceError, MarketplaceResult, ValidationError};
use crate::core::venue::{Amenities, VenueDraft};
use axum::extract::Multipart;
use std::collections::HashMap;
use std::str::FromStr;

/// Text fields and files of one multipart body
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: Vec<(String, Upload)>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> MarketplaceResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(String::from);
            let content_type = field.content_type().map(String::from);

            match file_name {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part for an untouched file input
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.push((
                        name,
                        Upload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    ));
                }
                None => {
                    let text = field.text().await?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self, name: &str) -> Option<&Upload> {
        self.files
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, upload)| upload)
    }

    pub fn files<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Upload> + 'a {
        self.files
            .iter()
            .filter(move |(field, _)| field == name)
            .map(|(_, upload)| upload)
    }

    fn required(&self, name: &str, errors: &mut Vec<FieldValidationError>) -> String {
        match self.text(name).map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => {
                errors.push(FieldValidationError {
                    field: name.to_string(),
                    message: format!("'{}' is required", name),
                });
                String::new()
            }
        }
    }

    fn number<T: FromStr + Default>(
        &self,
        name: &str,
        errors: &mut Vec<FieldValidationError>,
    ) -> T {
        let raw = self.required(name, errors);
        if raw.is_empty() {
            return T::default();
        }
        raw.parse().unwrap_or_else(|_| {
            errors.push(FieldValidationError {
                field: name.to_string(),
                message: format!("'{}' must be a number", name),
            });
            T::default()
        })
    }

    pub fn vendor_signup(&self) -> MarketplaceResult<VendorSignup> {
        let mut errors = Vec::new();
        let signup = VendorSignup {
            name: self.required("name", &mut errors),
            email: self.required("email", &mut errors).to_lowercase(),
            phone: self.required("phone", &mut errors),
            cnic_number: self.required("cnic_number", &mut errors),
            password: self.text("password").unwrap_or_default().to_string(),
            cnic_front_image: self.file("cnic_front_image").cloned(),
            cnic_back_image: self.file("cnic_back_image").cloned(),
        };
        if signup.password.is_empty() {
            errors.push(FieldValidationError {
                field: "password".to_string(),
                message: "'password' is required".to_string(),
            });
        }
        finish(signup, errors)
    }

    pub fn venue_form(&self) -> MarketplaceResult<VenueForm> {
        let mut errors = Vec::new();
        let draft = VenueDraft {
            name: self.required("name", &mut errors),
            description: self.text("description").unwrap_or_default().trim().to_string(),
            venue_type: self.required("venue_type", &mut errors),
            city: self.required("city", &mut errors),
            address: self.required("address", &mut errors),
            capacity: self.number("capacity", &mut errors),
            price_per_day: self.number("price_per_day", &mut errors),
            amenities: Amenities::parse(self.text("amenities").unwrap_or_default()),
        };
        let form = VenueForm {
            draft,
            images: self.files("images").cloned().collect(),
        };
        finish(form, errors)
    }
}

fn finish<T>(value: T, errors: Vec<FieldValidationError>) -> MarketplaceResult<T> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(MarketplaceError::Validation(ValidationError::FieldErrors(
            errors,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)], files: Vec<(&str, Upload)>) -> FormData {
        FormData {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: files
                .into_iter()
                .map(|(k, f)| (k.to_string(), f))
                .collect(),
        }
    }

    #[test]
    fn test_venue_form_parses_numbers_and_amenities() {
        let data = form(
            &[
                ("name", "Royal Palm"),
                ("venue_type", "Banquet Hall"),
                ("city", "Lahore"),
                ("address", "Canal Road"),
                ("capacity", "400"),
                ("price_per_day", "250000.5"),
                ("amenities", "Catering, Parking"),
            ],
            vec![("images", Upload::new("a.jpg", "image/jpeg", vec![1, 2]))],
        );

        let venue = data.venue_form().unwrap();
        assert_eq!(venue.draft.capacity, 400);
        assert_eq!(venue.draft.price_per_day, 250000.5);
        assert_eq!(venue.draft.amenities.len(), 2);
        assert_eq!(venue.images.len(), 1);
    }

    #[test]
    fn test_venue_form_collects_errors() {
        let data = form(&[("name", "X"), ("capacity", "lots")], vec![]);
        match data.venue_form().unwrap_err() {
            MarketplaceError::Validation(ValidationError::FieldErrors(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(
                    fields,
                    vec!["venue_type", "city", "address", "capacity", "price_per_day"]
                );
                assert_eq!(errors[3].message, "'capacity' must be a number");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_vendor_signup_requires_password() {
        let data = form(
            &[
                ("name", "Noor"),
                ("email", "Noor@Example.com"),
                ("phone", "03001234567"),
                ("cnic_number", "35202-1234567-1"),
            ],
            vec![],
        );
        assert!(data.vendor_signup().is_err());
    }

    #[test]
    fn test_file_lookup_by_field() {
        let data = form(
            &[],
            vec![
                ("cnic_front_image", Upload::new("f.png", "image/png", vec![1])),
                ("images", Upload::new("1.png", "image/png", vec![2])),
                ("images", Upload::new("2.png", "image/png", vec![3])),
            ],
        );
        assert_eq!(data.file("cnic_front_image").map(|f| f.size()), Some(1));
        assert!(data.file("cnic_back_image").is_none());
        assert_eq!(data.files("images").count(), 2);
    }
}
