// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Composite rendering and export.
//!
//! [`draw`] rasterizes the base image plus every annotation shape into a
//! single bitmap; [`export`] encodes that bitmap for persistence.

pub mod draw;
pub mod export;
