// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::StreamExt;
use futures::Stream;
use roster_core::{RosterError, StreamItem, Student};
use std::time::Duration;
use tokio::time::{sleep, timeout};

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("Unexpected element emitted, expected no output.");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

pub async fn expect_next_student<S>(stream: &mut S, expected: Student)
where
    S: Stream<Item = StreamItem<Student>> + Unpin,
{
    let item = timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("timed out waiting for next item")
        .expect("expected next item");
    assert_eq!(item, StreamItem::Value(expected));
}

/// Pulls `count` items, failing the test if they do not arrive within a second.
pub async fn take_students<S>(stream: &mut S, count: usize) -> Vec<Student>
where
    S: Stream<Item = StreamItem<Student>> + Unpin,
{
    let mut students = Vec::with_capacity(count);
    for _ in 0..count {
        let item = timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("timed out waiting for next item")
            .expect("stream ended early");
        match Result::<Student, RosterError>::from(item) {
            Ok(student) => students.push(student),
            Err(error) => panic!("stream failed after {} items: {error}", students.len()),
        }
    }
    students
}

/// Names of `students`, for compact assertions.
#[must_use]
pub fn names(students: &[Student]) -> Vec<&str> {
    students.iter().map(Student::name).collect()
}
