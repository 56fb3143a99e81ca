//! Output formatting for the CLI.

use configurator::engine::{Availability, PriceBreakdown};
use configurator::Money;
use console::style;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a step in a process.
    pub fn step(&self, num: usize, total: usize, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style(format!("[{}/{}]", num, total)).dim(), msg);
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print an itemized price breakdown.
    pub fn breakdown(&self, breakdown: &PriceBreakdown) {
        if self.json {
            return;
        }
        let widths = [16, 28, 12];
        self.table_row(&["Base price", "", &breakdown.base.display()], &widths);
        for line in &breakdown.lines {
            let price = price_label(line.nominal, line.effective);
            self.table_row(&[&line.category_name, &line.option_name, &price], &widths);
        }
        println!(
            "  {}",
            style(format!("{:>60}", format!("Total {}", breakdown.total.display()))).bold()
        );
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Effective price, with the nominal price alongside when an override applies.
pub fn price_label(nominal: Money, effective: Money) -> String {
    if nominal == effective {
        format!("+{}", effective.display())
    } else {
        format!(
            "+{} {}",
            style(effective.display()).green(),
            style(format!("(was {})", nominal.display())).dim().strikethrough()
        )
    }
}

/// Availability badge for option listings.
pub fn availability_badge(availability: &Availability) -> String {
    match availability {
        Availability::Available => style("available").green().to_string(),
        Availability::Unavailable(reason) => style(reason.to_string()).red().to_string(),
    }
}
