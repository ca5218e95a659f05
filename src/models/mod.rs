// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models for annotations and review submissions.

pub mod annotation_set;
pub mod history;
pub mod shape;
pub mod submission;
