// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — the decoded pixel buffer handed to recognition engines.

pub mod decoded;

pub use decoded::DecodedImage;
