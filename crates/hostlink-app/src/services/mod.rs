// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer for the harness: the simulated native host and the demo run
// that drives a bridge against it.

pub mod demo;
pub mod simulated_host;
