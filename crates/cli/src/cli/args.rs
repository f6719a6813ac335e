// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` by every command that
//! takes task fields.

use clap::Args;

use crate::validate::TaskFields;

/// Task field flags.
#[derive(Args, Clone, Debug, Default)]
pub struct TaskArgs {
    /// Due date (YYYY-MM-DD)
    #[arg(long, short = 'f', value_name = "DATE")]
    pub fecha: Option<String>,

    /// Task description
    #[arg(long, short = 'd')]
    pub descripcion: Option<String>,

    /// Image URL (repeat up to 3 times)
    #[arg(long = "imagen", short = 'i', value_name = "URL")]
    pub imagenes: Vec<String>,

    /// Remove all images
    #[arg(long, conflicts_with = "imagenes")]
    pub clear_images: bool,
}

impl TaskArgs {
    /// Converts the flags plus an optional name into task fields.
    pub fn into_fields(self, nombre: Option<String>) -> TaskFields {
        let imagenes = if self.clear_images {
            Some(Vec::new())
        } else if self.imagenes.is_empty() {
            None
        } else {
            Some(self.imagenes)
        };
        TaskFields {
            nombre,
            fecha: self.fecha,
            descripcion: self.descripcion,
            imagenes,
        }
    }
}
