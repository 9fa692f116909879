//! Tick Reporting
//!
//! Human-readable console output for each scan tick. Detection keeps its
//! input-order list; display re-sorts a borrowed copy by profit so the most
//! lucrative cycle always prints first.

use crate::engine::Opportunity;
use crate::mints::MintBook;
use console::style;
use rust_decimal::Decimal;

/// Print the result of one scan tick
pub fn print_tick_report(opportunities: &[Opportunity], book: &MintBook) {
    if opportunities.is_empty() {
        println!("{}", style("No opportunities this tick.").dim());
        return;
    }

    println!(
        "{}",
        style(format!(
            "⚡ {} profitable cycle(s) found",
            opportunities.len()
        ))
        .green()
        .bold()
    );

    for (rank, opportunity) in sorted_for_display(opportunities).iter().enumerate() {
        let profit = format_signed(opportunity.profit);
        let pct = format_signed(opportunity.profit_pct().round_dp(2));
        println!(
            "  {}. {}",
            rank + 1,
            style(symbol_path(opportunity, book)).cyan()
        );
        println!(
            "     in {}  out {}  profit {} ({}%)",
            format_amount(opportunity.amount_in),
            format_amount(opportunity.amount_out),
            style(profit).green().bold(),
            pct,
        );
    }
}

/// Render a cycle path with ticker symbols where the book knows them,
/// clipped mint addresses where it doesn't
pub fn symbol_path(opportunity: &Opportunity, book: &MintBook) -> String {
    opportunity
        .path
        .iter()
        .map(|mint| format_mint(mint, book.symbol_for(mint)))
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Prefer the ticker symbol; otherwise clip the mint address to a readable
/// prefix. Truncation counts chars, not bytes.
pub fn format_mint(mint: &str, symbol: Option<&str>) -> String {
    if let Some(symbol) = symbol {
        return symbol.to_string();
    }

    let mut chars = mint.chars();
    let prefix: String = chars.by_ref().take(8).collect();
    if chars.next().is_some() {
        format!("{}…", prefix)
    } else {
        prefix
    }
}

/// Borrowed view of the opportunities, most profitable first. The stable
/// sort keeps detection order among equal profits.
fn sorted_for_display(opportunities: &[Opportunity]) -> Vec<&Opportunity> {
    let mut sorted: Vec<&Opportunity> = opportunities.iter().collect();
    sorted.sort_by(|a, b| b.profit.cmp(&a.profit));
    sorted
}

fn format_amount(value: Decimal) -> String {
    value.round_dp(6).normalize().to_string()
}

fn format_signed(value: Decimal) -> String {
    if value.is_sign_negative() {
        value.normalize().to_string()
    } else {
        format!("+{}", value.normalize())
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn opportunity(profit: &str, first_hop: &str) -> Opportunity {
        let amount_in = Decimal::TEN;
        let profit: Decimal = profit.parse().unwrap();
        Opportunity {
            path: [
                "BASE".to_string(),
                first_hop.to_string(),
                "MID".to_string(),
                "BASE".to_string(),
            ],
            amount_in,
            amount_out: amount_in + profit,
            profit,
        }
    }

    #[test]
    fn test_format_mint_prefers_symbol() {
        assert_eq!(
            format_mint("So11111111111111111111111111111111111111112", Some("SOL")),
            "SOL"
        );
    }

    #[test]
    fn test_format_mint_clips_unknown_addresses() {
        assert_eq!(
            format_mint("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", None),
            "EPjFWdd5…"
        );
    }

    #[test]
    fn test_format_mint_keeps_short_values() {
        assert_eq!(format_mint("SOL", None), "SOL");
        assert_eq!(format_mint("ABCDEFGH", None), "ABCDEFGH");
    }

    #[test]
    fn test_symbol_path_falls_back_to_clipped_mints() {
        let book = MintBook::new("http://localhost.invalid", "/tmp/none.json", 60);
        let opportunity = Opportunity {
            path: [
                "So11111111111111111111111111111111111111112".to_string(),
                "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
                "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB".to_string(),
                "So11111111111111111111111111111111111111112".to_string(),
            ],
            amount_in: Decimal::TEN,
            amount_out: Decimal::TEN,
            profit: Decimal::ZERO,
        };

        assert_eq!(
            symbol_path(&opportunity, &book),
            "So111111… → EPjFWdd5… → Es9vMFrz… → So111111…"
        );
    }

    #[test]
    fn test_sorted_for_display_orders_by_profit_desc() {
        let opportunities = vec![
            opportunity("0.5", "AAA"),
            opportunity("2.0", "BBB"),
            opportunity("1.0", "CCC"),
        ];

        let sorted = sorted_for_display(&opportunities);
        assert_eq!(sorted[0].path[1], "BBB");
        assert_eq!(sorted[1].path[1], "CCC");
        assert_eq!(sorted[2].path[1], "AAA");

        // Original detection order untouched
        assert_eq!(opportunities[0].path[1], "AAA");
    }

    #[test]
    fn test_sorted_for_display_is_stable_on_ties() {
        let opportunities = vec![
            opportunity("1.0", "FIRST"),
            opportunity("1.0", "SECOND"),
        ];

        let sorted = sorted_for_display(&opportunities);
        assert_eq!(sorted[0].path[1], "FIRST");
        assert_eq!(sorted[1].path[1], "SECOND");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed("0.50".parse().unwrap()), "+0.5");
        assert_eq!(format_signed("-0.25".parse().unwrap()), "-0.25");
        assert_eq!(format_signed(Decimal::ZERO), "+0");
    }
}
