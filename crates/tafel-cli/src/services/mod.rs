// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Services behind the `tafel` command: output layout and the extraction run.

pub mod extract;
pub mod output_dir;
