// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend writes.
//!
//! - `roster`: duties and charts, plus [`MutationOutcome`] for core mutations
//! - `dashboard`: the user's dashboard office list

mod dashboard;
mod roster;

pub use roster::MutationOutcome;
