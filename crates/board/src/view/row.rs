use chrono::{DateTime, Local};
use common::models::{Action, Signal};
use feed::store::BoardSnapshot;
use ratatui::style::Color;

pub const BUY_GREEN: Color = Color::Rgb(0x10, 0xb9, 0x81);
pub const SELL_RED: Color = Color::Rgb(0xef, 0x44, 0x44);
pub const HOLD_AMBER: Color = Color::Rgb(0xf5, 0x9e, 0x0b);

pub const PLACEHOLDER: &str = "—";

const TIME_FORMAT: &str = "%H:%M:%S";

/// Display-ready cells for one signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub symbol: String,
    pub price: String,
    pub action: String,
    pub color: Color,
    pub confidence: String,
    pub time: String,
}

impl From<&Signal> for SignalRow {
    fn from(signal: &Signal) -> Self {
        Self {
            symbol: format_symbol(signal.symbol.as_deref()),
            price: format_price(signal.price),
            action: format!("{} {}", action_emoji(&signal.action), signal.action),
            color: action_color(&signal.action),
            confidence: format_confidence(signal.confidence),
            time: format_time(signal.timestamp.as_ref()),
        }
    }
}

pub fn rows_newest_first(board: &BoardSnapshot) -> Vec<SignalRow> {
    board.newest_first().map(SignalRow::from).collect()
}

pub fn action_color(action: &Action) -> Color {
    match action {
        Action::Buy => BUY_GREEN,
        Action::Sell => SELL_RED,
        Action::Hold | Action::Other(_) => HOLD_AMBER,
    }
}

pub fn action_emoji(action: &Action) -> &'static str {
    match action {
        Action::Buy => "🚀",
        Action::Sell => "📉",
        Action::Hold | Action::Other(_) => "➡️",
    }
}

pub fn format_symbol(symbol: Option<&str>) -> String {
    match symbol {
        Some(symbol) if !symbol.is_empty() => symbol.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Ties round away from zero; `{:.N}` alone would round them to even.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(price) => format!("${:.2}", (price * 100.0).round() / 100.0),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(confidence) => format!("{:.0}%", (confidence * 100.0).round()),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_time(timestamp: Option<&DateTime<Local>>) -> String {
    match timestamp {
        Some(timestamp) => timestamp.format(TIME_FORMAT).to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use common::models::SignalId;

    fn signal(symbol: &str, action: Action) -> Signal {
        Signal {
            id: SignalId::Text(symbol.to_string()),
            symbol: Some(symbol.to_string()),
            price: Some(1234.5),
            action,
            confidence: Some(0.8734),
            timestamp: None,
        }
    }

    #[test]
    fn test_action_colors_and_emoji() {
        assert_eq!(action_color(&Action::Buy), Color::Rgb(0x10, 0xb9, 0x81));
        assert_eq!(action_emoji(&Action::Buy), "🚀");

        assert_eq!(action_color(&Action::Sell), Color::Rgb(0xef, 0x44, 0x44));
        assert_eq!(action_emoji(&Action::Sell), "📉");

        for other in [
            Action::Hold,
            Action::Other(String::new()),
            Action::Other("ACCUMULATE".to_string()),
        ] {
            assert_eq!(action_color(&other), Color::Rgb(0xf5, 0x9e, 0x0b));
            assert_eq!(action_emoji(&other), "➡️");
        }
    }

    #[test]
    fn test_numeric_formatting() {
        assert_eq!(format_price(Some(1234.5)), "$1234.50");
        assert_eq!(format_price(Some(0.004)), "$0.00");
        assert_eq!(format_confidence(Some(0.8734)), "87%");
        assert_eq!(format_confidence(Some(1.0)), "100%");
    }

    #[test]
    fn test_ties_round_up_like_the_web_client() {
        assert_eq!(format_confidence(Some(0.625)), "63%");
        assert_eq!(format_confidence(Some(0.125)), "13%");
        assert_eq!(format_price(Some(0.125)), "$0.13");
        assert_eq!(format_price(Some(2.5)), "$2.50");
        assert_eq!(format_price(Some(-0.125)), "$-0.13");
    }

    #[test]
    fn test_missing_values_use_placeholder() {
        let mut bare = signal("PEPE", Action::Hold);
        bare.price = None;
        bare.confidence = None;
        bare.symbol = None;

        let row = SignalRow::from(&bare);
        assert_eq!(row.symbol, PLACEHOLDER);
        assert_eq!(row.price, PLACEHOLDER);
        assert_eq!(row.confidence, PLACEHOLDER);
        assert_eq!(row.time, PLACEHOLDER);
    }

    #[test]
    fn test_row_cells() {
        let mut buy = signal("BTC", Action::Buy);
        buy.timestamp = Local.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).single();

        let row = SignalRow::from(&buy);
        assert_eq!(row.symbol, "BTC");
        assert_eq!(row.price, "$1234.50");
        assert_eq!(row.action, "🚀 BUY");
        assert_eq!(row.color, BUY_GREEN);
        assert_eq!(row.confidence, "87%");
        assert_eq!(row.time, "14:05:09");

        let odd = SignalRow::from(&signal("XRP", Action::Other("WAIT".to_string())));
        assert_eq!(odd.action, "➡️ WAIT");
    }

    #[test]
    fn test_rows_are_newest_first() {
        let board = BoardSnapshot {
            signals: vec![
                signal("s1", Action::Buy),
                signal("s2", Action::Sell),
                signal("s3", Action::Hold),
            ],
            total: 3,
            generation: 1,
        };

        let symbols: Vec<String> = rows_newest_first(&board)
            .into_iter()
            .map(|row| row.symbol)
            .collect();
        assert_eq!(symbols, vec!["s3", "s2", "s1"]);
    }
}
