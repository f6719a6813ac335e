// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Task field validation.
//!
//! A task document has four fields: `nombre` (name), `fecha` (due date,
//! `YYYY-MM-DD`), `descripcion` and `urlImagenes` (image URLs).

use chrono::NaiveDate;
use serde_json::Value;

use tareas_core::Document;

use crate::error::{Error, Result};

// Input length limits
pub const MAX_NOMBRE_LENGTH: usize = 500;
pub const MAX_DESCRIPCION_LENGTH: usize = 100_000;
pub const MAX_IMAGES: usize = 3;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate a task name and return it trimmed.
pub fn validate_nombre(nombre: &str) -> Result<String> {
    let trimmed = nombre.trim();
    if trimmed.is_empty() {
        return Err(Error::FieldEmpty { field: "Name" });
    }
    if trimmed.chars().count() > MAX_NOMBRE_LENGTH {
        return Err(Error::FieldTooLong {
            field: "Name",
            actual: trimmed.chars().count(),
            max: MAX_NOMBRE_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}

/// Validate a due date: `YYYY-MM-DD`, not before `today`.
pub fn validate_fecha(fecha: &str, today: NaiveDate) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(fecha.trim(), DATE_FORMAT).map_err(|_| {
        Error::InvalidDate {
            value: fecha.to_string(),
        }
    })?;
    if date < today {
        return Err(Error::DateInPast {
            value: fecha.to_string(),
        });
    }
    Ok(date)
}

/// Validate that a description is within length limits
pub fn validate_descripcion(descripcion: &str) -> Result<()> {
    if descripcion.len() > MAX_DESCRIPCION_LENGTH {
        return Err(Error::FieldTooLong {
            field: "Description",
            actual: descripcion.len(),
            max: MAX_DESCRIPCION_LENGTH,
        });
    }
    Ok(())
}

/// Validate the image list: at most [`MAX_IMAGES`], no blank entries.
pub fn validate_images(urls: &[String]) -> Result<()> {
    if urls.len() > MAX_IMAGES {
        return Err(Error::TooManyImages {
            actual: urls.len(),
            max: MAX_IMAGES,
        });
    }
    if urls.iter().any(|u| u.trim().is_empty()) {
        return Err(Error::FieldEmpty { field: "Image URL" });
    }
    Ok(())
}

/// Task fields as entered by the user. Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFields {
    pub nombre: Option<String>,
    pub fecha: Option<String>,
    pub descripcion: Option<String>,
    pub imagenes: Option<Vec<String>>,
}

impl TaskFields {
    /// Reads the task fields of a stored document, ignoring anything else.
    pub fn from_document(doc: &Document) -> Self {
        let text = |key: &str| doc.get(key).and_then(Value::as_str).map(String::from);
        let imagenes = doc.get("urlImagenes").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        });
        TaskFields {
            nombre: text("nombre"),
            fecha: text("fecha"),
            descripcion: text("descripcion"),
            imagenes,
        }
    }

    /// Fills fields absent here from `fallback`.
    pub fn or(self, fallback: TaskFields) -> TaskFields {
        TaskFields {
            nombre: self.nombre.or(fallback.nombre),
            fecha: self.fecha.or(fallback.fecha),
            descripcion: self.descripcion.or(fallback.descripcion),
            imagenes: self.imagenes.or(fallback.imagenes),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.fecha.is_none()
            && self.descripcion.is_none()
            && self.imagenes.is_none()
    }

    /// The present fields as a document, unvalidated.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        if let Some(nombre) = &self.nombre {
            doc.insert("nombre".into(), Value::from(nombre.as_str()));
        }
        if let Some(fecha) = &self.fecha {
            doc.insert("fecha".into(), Value::from(fecha.as_str()));
        }
        if let Some(descripcion) = &self.descripcion {
            doc.insert("descripcion".into(), Value::from(descripcion.as_str()));
        }
        if let Some(imagenes) = &self.imagenes {
            doc.insert("urlImagenes".into(), Value::from(imagenes.clone()));
        }
        doc
    }

    /// Builds the document for a new task.
    ///
    /// Name and due date are required; description defaults to empty and the
    /// image list to none.
    pub fn into_new_task(self, today: NaiveDate) -> Result<Document> {
        let nombre = self.nombre.ok_or(Error::FieldRequired { field: "Name" })?;
        let fecha = self.fecha.ok_or(Error::FieldRequired { field: "Due date" })?;

        TaskFields {
            nombre: Some(nombre),
            fecha: Some(fecha),
            descripcion: Some(self.descripcion.unwrap_or_default()),
            imagenes: Some(self.imagenes.unwrap_or_default()),
        }
        .into_changes(today)
    }

    /// Builds an update payload holding only the present fields.
    pub fn into_changes(self, today: NaiveDate) -> Result<Document> {
        if self.is_empty() {
            return Err(Error::NothingToEdit);
        }

        let mut fields = self;
        if let Some(nombre) = &fields.nombre {
            fields.nombre = Some(validate_nombre(nombre)?);
        }
        if let Some(fecha) = &fields.fecha {
            fields.fecha = Some(validate_fecha(fecha, today)?.format(DATE_FORMAT).to_string());
        }
        if let Some(descripcion) = &fields.descripcion {
            validate_descripcion(descripcion)?;
        }
        if let Some(imagenes) = &fields.imagenes {
            validate_images(imagenes)?;
        }
        Ok(fields.to_document())
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
