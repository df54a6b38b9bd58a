// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The record carried by the stream.
//!
//! The JSON layout is fixed by the remote server: `nome`, `sexo` and `notas`.
//!
//! ```
//! use roster_core::{Sex, Student};
//!
//! let json = r#"{"nome":"Ana","sexo":"m","notas":[7.0]}"#;
//! let student: Student = serde_json::from_str(json).unwrap();
//!
//! assert_eq!(student, Student::new("Ana", Sex::Male, vec![7.0]));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Two-valued category, serialized as a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
}

impl Sex {
    /// The wire code for this category.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "m",
            Self::Female => "f",
        }
    }
}

impl Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Immutable student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "nome")]
    name: String,
    #[serde(rename = "sexo")]
    sex: Sex,
    #[serde(rename = "notas")]
    grades: Vec<f32>,
}

impl Student {
    #[must_use]
    pub fn new(name: impl Into<String>, sex: Sex, grades: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            sex,
            grades,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn sex(&self) -> Sex {
        self.sex
    }

    /// Scores in the order the server reported them.
    #[must_use]
    pub fn grades(&self) -> &[f32] {
        &self.grades
    }

    /// Arithmetic mean of the scores, `None` when there are none.
    #[must_use]
    pub fn average(&self) -> Option<f32> {
        if self.grades.is_empty() {
            return None;
        }
        Some(self.grades.iter().sum::<f32>() / self.grades.len() as f32)
    }
}

impl Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Student[name={}, sex={}, grades={:?}]",
            self.name, self.sex, self.grades
        )
    }
}
