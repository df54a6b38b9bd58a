// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use roster_core::{Sex, Student};

#[must_use]
pub fn student_ana() -> Student {
    Student::new("Ana", Sex::Male, vec![7.0])
}

#[must_use]
pub fn student_bia() -> Student {
    Student::new("Bia", Sex::Female, vec![8.5])
}

#[must_use]
pub fn student_carla() -> Student {
    Student::new("Carla", Sex::Female, vec![9.0, 6.5])
}

#[must_use]
pub fn student_davi() -> Student {
    Student::new("Davi", Sex::Male, vec![5.5, 7.25, 10.0])
}

/// What the scripted server returns from `/existentes`.
#[must_use]
pub fn existing_students() -> Vec<Student> {
    vec![student_ana(), student_bia()]
}

/// What the scripted server returns from `/novos`, one per request.
#[must_use]
pub fn new_students() -> Vec<Student> {
    vec![student_carla(), student_davi()]
}

/// `count` distinct students named `S0`, `S1`, ...
#[must_use]
pub fn numbered_students(count: usize) -> Vec<Student> {
    (0..count)
        .map(|i| Student::new(format!("S{i}"), Sex::Female, vec![i as f32]))
        .collect()
}
