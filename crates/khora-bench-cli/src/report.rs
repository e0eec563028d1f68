// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use khora_bench::{ExitReport, Invocation, SweepObserver, SweepSummary};
use std::time::Duration;

// ANSI color codes
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const GREEN: &str = "\x1b[32m";
pub const RED: &str = "\x1b[31m";
pub const BLUE: &str = "\x1b[34m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

// Visual symbols
pub const CHECK: &str = "✓";
pub const CROSS: &str = "✗";
pub const WARN: &str = "⚠";
pub const BULB: &str = "💡";
pub const LIGHT: &str = "🔦";
pub const CLIPBOARD: &str = "📋";

pub const BANNER: &str = concat!(
    "\x1b[1m",
    "\x1b[36m", // BOLD, CYAN
    "╔═══════════════════════════════════════════════════════════╗\n",
    "║                    ",
    "🔦",
    " KHORA BENCH ",
    "⚙",
    "                       ║\n",
    "║                  Light-Count Sweep Harness                ║\n",
    "╚═══════════════════════════════════════════════════════════╝",
    "\x1b[0m" // RESET
);

pub fn print_task_start(task_name: &str, emoji: &str, color: &str) {
    println!(
        "\n{}{}━━━ {} {} {}━━━{}",
        BOLD, color, emoji, task_name, emoji, RESET
    );
}

pub fn print_info(message: &str) {
    println!("{}{} Info:{} {}", BOLD, BULB, RESET, message);
}

pub fn print_success(message: &str) {
    println!("{}{} {} {}{}", BOLD, GREEN, CHECK, message, RESET);
}

pub fn print_error(message: &str) {
    eprintln!("{}{} {} {}{}", BOLD, RED, CROSS, message, RESET);
}

pub fn print_command_info(command_line: &str) {
    println!(
        "{}{}{} Command:{} {}",
        BOLD, CYAN, CLIPBOARD, RESET, command_line
    );
}

/// Prints one status block per renderer run and a closing summary.
#[derive(Debug, Default)]
pub struct TerminalReporter {
    /// Set when the harness is only printing what it would launch.
    dry_run: bool,
}

impl TerminalReporter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl SweepObserver for TerminalReporter {
    fn on_sweep_start(&mut self, total: usize) {
        println!("{}", BANNER);
        let title = if self.dry_run {
            "Dry Run"
        } else {
            "Running Sweep"
        };
        print_task_start(title, LIGHT, BLUE);
        print_info(&format!("{} renderer runs queued", total));
    }

    fn before_launch(&mut self, index: usize, total: usize, invocation: &Invocation) {
        println!(
            "\n{}{}[{}/{}] {} lights, {}{}",
            BOLD,
            MAGENTA,
            index + 1,
            total,
            invocation.point.lights,
            invocation.point.pipeline,
            RESET
        );
        // The runner already records the command line at info level.
        if !log::log_enabled!(target: "khora_bench::runner", log::Level::Info) {
            print_command_info(&invocation.command_line());
        }
    }

    fn after_exit(
        &mut self,
        _index: usize,
        _total: usize,
        _invocation: &Invocation,
        exit: ExitReport,
        elapsed: Duration,
    ) {
        if self.dry_run {
            return;
        }
        if exit.success() {
            print_success(&format!("Completed in {:.2}s", elapsed.as_secs_f64()));
        } else {
            print_error(&format!(
                "Renderer {} after {:.2}s",
                exit,
                elapsed.as_secs_f64()
            ));
        }
    }

    fn on_sweep_end(&mut self, summary: &SweepSummary) {
        println!(
            "\n{}{}╔═══════════════════════════════════════╗{}",
            BOLD, CYAN, RESET
        );
        println!(
            "{}{}║             SWEEP SUMMARY             ║{}",
            BOLD, CYAN, RESET
        );
        println!(
            "{}{}╚═══════════════════════════════════════╝{}",
            BOLD, CYAN, RESET
        );

        if summary.failed == 0 {
            println!(
                "{}{} {} All {} runs completed successfully!{}",
                BOLD, GREEN, CHECK, summary.attempted, RESET
            );
        } else {
            println!(
                "{}{} {} {}/{} runs completed, {} failed{}",
                BOLD, YELLOW, WARN, summary.succeeded, summary.attempted, summary.failed, RESET
            );
        }

        println!(
            "{}{}Total time: {:.2}s{}",
            BOLD,
            BLUE,
            summary.elapsed.as_secs_f64(),
            RESET
        );
    }
}
