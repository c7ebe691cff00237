use pgn_salvage::RecoveryResult;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_report(result: &RecoveryResult, color: bool) {
    let palette = ansi::Palette::new(color);

    if !result.success {
        println!("\n{}", palette.bold(palette.paint("✗ Recovery failed", ansi::RED)));
        if let Some(error) = &result.error {
            println!("  {error}");
        }
        println!();
        return;
    }

    let headline = if result.is_partial {
        palette.paint(format!("◐ Partial recovery: {} moves", result.moves_found), ansi::YELLOW)
    } else {
        palette.paint(format!("✓ Recovered {} moves", result.moves_found), ansi::GREEN)
    };
    println!("\n{}", palette.bold(headline));

    println!("\n{}", palette.paint("━━━ Movetext ━━━", ansi::GRAY));
    println!("  {}", result.movetext);

    if let Some(metadata) = &result.metadata {
        println!("\n{}", palette.paint("━━━ Game ━━━", ansi::GRAY));
        println!(
            "  {} {} {} {}",
            palette.dim("White:"),
            palette.paint(&metadata.white.name, ansi::CYAN),
            palette.dim("│ Black:"),
            palette.paint(&metadata.black.name, ansi::CYAN)
        );
        if let Some(event) = &metadata.event {
            println!("  {} {}", palette.dim("Event:"), palette.paint(event, ansi::BLUE));
        }
        if let Some(date) = &metadata.date {
            println!("  {} {}", palette.dim("Date: "), palette.paint(date, ansi::BLUE));
        }
        if !metadata.clock_times.is_empty() {
            println!("  {} {} readings", palette.dim("Clock:"), metadata.clock_times.len());
        }
    }

    if let Some(warning) = &result.quality_warning {
        println!("\n{}", palette.paint(format!("⚠  {warning}"), ansi::YELLOW));
    }
    if let Some(failed_at) = &result.failed_at {
        println!("{}", palette.dim(format!("   Stopped at {failed_at}")));
    }
    println!();
}
