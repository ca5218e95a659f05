// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Review submissions as exposed by the backend.
//!
//! The status workflow lives on the server; the editor only reads it and
//! reports what it saved.

use super::annotation_set::AnnotationSet;
use serde::{Deserialize, Serialize};

/// Where a submission is in the review workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Uploaded,
    Annotated,
    Reported,
}

/// A patient upload awaiting (or past) clinician review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub image_url: String,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub annotation_data: Option<AnnotationSet>,
}

impl Submission {
    /// Whether a clinician may still edit annotations.
    pub fn is_editable(&self) -> bool {
        !matches!(self.status, SubmissionStatus::Reported)
    }
}
