use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::ids::{CourseId, LessonId};

/// Progress per lesson within one course. Values are not bounded or ordered.
///
/// Decoding skips lessons whose value is not a number (the page writes `NaN`
/// as `null`), so one bad entry never voids the rest of the map.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LessonProgress {
    lessons: BTreeMap<LessonId, f64>,
}

impl LessonProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress for `lesson`, or `0.0` if it was never recorded.
    #[must_use]
    pub fn get(&self, lesson: &LessonId) -> f64 {
        self.lessons.get(lesson).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, lesson: LessonId, value: f64) {
        self.lessons.insert(lesson, value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LessonId, f64)> {
        self.lessons.iter().map(|(id, value)| (id, *value))
    }
}

impl FromIterator<(LessonId, f64)> for LessonProgress {
    fn from_iter<I: IntoIterator<Item = (LessonId, f64)>>(iter: I) -> Self {
        Self {
            lessons: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for LessonProgress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<LessonId, Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(lesson, value)| value.as_f64().map(|v| (lesson, v)))
            .collect())
    }
}

/// The whole two-level map persisted under a single key.
///
/// A course entry that is not an object is dropped on decode; its siblings
/// are kept.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CourseProgress {
    courses: BTreeMap<CourseId, LessonProgress>,
}

impl CourseProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn course(&self, course: &CourseId) -> Option<&LessonProgress> {
        self.courses.get(course)
    }

    #[must_use]
    pub fn lesson(&self, course: &CourseId, lesson: &LessonId) -> f64 {
        self.course(course).map_or(0.0, |lessons| lessons.get(lesson))
    }

    /// Records a lesson value, creating the course entry on first write.
    pub fn record(&mut self, course: CourseId, lesson: LessonId, value: f64) {
        self.courses.entry(course).or_default().set(lesson, value);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

}

impl<'de> Deserialize<'de> for CourseProgress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<CourseId, Value>::deserialize(deserializer)?;
        let courses = raw
            .into_iter()
            .filter_map(|(course, value)| {
                LessonProgress::deserialize(value)
                    .ok()
                    .map(|lessons| (course, lessons))
            })
            .collect();
        Ok(Self { courses })
    }
}

/// Answer to a progress lookup: one lesson, or the whole course when no
/// lesson was named.
#[derive(Clone, Debug, PartialEq)]
pub enum Progress {
    Lesson(f64),
    Course(LessonProgress),
}

impl Progress {
    #[must_use]
    pub fn lookup(all: &CourseProgress, course: &CourseId, lesson: Option<&LessonId>) -> Self {
        match lesson {
            Some(lesson) => Progress::Lesson(all.lesson(course, lesson)),
            None => Progress::Course(all.course(course).cloned().unwrap_or_default()),
        }
    }
}
