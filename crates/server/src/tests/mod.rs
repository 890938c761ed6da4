// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP handler tests.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod assignment_route_tests;
mod helpers;
mod request_route_tests;
