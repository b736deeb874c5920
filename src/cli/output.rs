//! Output formatting for CLI commands

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:24} {}", format!("{key}:"), value);
}

/// Render a histogram bar of `count` out of `max` as a fixed-width strip
pub fn histogram_bar(count: usize, max: usize, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = (count * width).div_ceil(max.max(1)).min(width);
    "#".repeat(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_bar_scales_to_width() {
        assert_eq!(histogram_bar(10, 10, 20).len(), 20);
        assert_eq!(histogram_bar(0, 10, 20).len(), 0);
        assert!(histogram_bar(5, 10, 20).len() <= 20);
    }
}
