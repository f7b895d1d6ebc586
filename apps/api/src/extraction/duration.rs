//! Service duration: derives an elapsed-year count from a free-text date range.
//!
//! Accepts `MM/YYYY` and `<month> YYYY` tokens. Exactly two tokens are required;
//! the day of month is always taken as the 1st.

use chrono::NaiveDate;
use regex::Regex;

use crate::extraction::error::DurationError;

const DAYS_PER_YEAR: f64 = 365.25;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Date-token scanner. Built once per field extractor.
#[derive(Debug, Clone)]
pub struct DateTokenizer {
    pattern: Regex,
}

impl DateTokenizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"(\d{1,2}/\d{4}|\w+\s+\d{4})")?,
        })
    }

    pub fn tokens<'a>(&self, value: &'a str) -> Vec<&'a str> {
        self.pattern.find_iter(value).map(|m| m.as_str()).collect()
    }

    /// Years between the two dates in `value`, rounded to one decimal place.
    pub fn years_of_service(&self, value: &str) -> Result<f64, DurationError> {
        let tokens = self.tokens(value);
        let [start, end] = tokens.as_slice() else {
            return Err(DurationError::TokenCount(tokens.len()));
        };

        let start = parse_date_token(start)?;
        let end = parse_date_token(end)?;
        let years = (end - start).num_days() as f64 / DAYS_PER_YEAR;
        Ok((years * 10.0).round() / 10.0)
    }
}

/// Parses `MM/YYYY` or `<month name|month number> YYYY` to the first of that month.
pub fn parse_date_token(token: &str) -> Result<NaiveDate, DurationError> {
    let unparseable = || DurationError::Unparseable(token.to_string());

    let (month, year) = match token.split_once('/') {
        Some((month, year)) => (month.trim(), year.trim()),
        None => {
            let mut parts = token.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(month), Some(year)) => (month, year),
                _ => return Err(unparseable()),
            }
        }
    };

    let month = month_number(month).ok_or_else(unparseable)?;
    let year: i32 = year.parse().map_err(|_| unparseable())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(unparseable)
}

fn month_number(word: &str) -> Option<u32> {
    if let Ok(n) = word.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }

    let word = word.trim_end_matches('.').to_lowercase();
    if word == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|name| *name == word || (word.len() == 3 && name.starts_with(word.as_str())))
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> DateTokenizer {
        DateTokenizer::new().unwrap()
    }

    #[test]
    fn test_numeric_range_five_years() {
        let years = tokenizer().years_of_service("01/2015 - 01/2020").unwrap();
        assert!((years - 5.0).abs() <= 0.1, "Years was {years}");
    }

    #[test]
    fn test_month_name_range() {
        let years = tokenizer()
            .years_of_service("March 2010 to September 2016")
            .unwrap();
        assert!((years - 6.5).abs() < f64::EPSILON, "Years was {years}");
    }

    #[test]
    fn test_abbreviated_months() {
        let years = tokenizer().years_of_service("Jan 2018 - Jul 2019").unwrap();
        assert!((years - 1.5).abs() < f64::EPSILON, "Years was {years}");
    }

    #[test]
    fn test_zero_tokens_is_count_error() {
        assert_eq!(
            tokenizer().years_of_service("Ongoing"),
            Err(DurationError::TokenCount(0))
        );
    }

    #[test]
    fn test_one_token_is_count_error() {
        assert_eq!(
            tokenizer().years_of_service("Since 05/2012"),
            Err(DurationError::TokenCount(1))
        );
    }

    #[test]
    fn test_three_tokens_is_count_error() {
        assert_eq!(
            tokenizer().years_of_service("01/2001 - 01/2005, 01/2008"),
            Err(DurationError::TokenCount(3))
        );
    }

    #[test]
    fn test_non_month_word_is_unparseable() {
        let err = tokenizer()
            .years_of_service("Enlisted 2004, discharged 2012")
            .unwrap_err();
        assert_eq!(err, DurationError::Unparseable("Enlisted 2004".to_string()));
    }

    #[test]
    fn test_invalid_numeric_month_is_unparseable() {
        assert!(matches!(
            parse_date_token("13/2020"),
            Err(DurationError::Unparseable(_))
        ));
    }

    #[test]
    fn test_day_defaults_to_first_of_month() {
        assert_eq!(
            parse_date_token("Sept 2011").unwrap(),
            NaiveDate::from_ymd_opt(2011, 9, 1).unwrap()
        );
        assert_eq!(
            parse_date_token("6/1999").unwrap(),
            NaiveDate::from_ymd_opt(1999, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_reversed_range_is_negative() {
        let years = tokenizer().years_of_service("01/2020 - 01/2019").unwrap();
        assert!((years + 1.0).abs() < f64::EPSILON, "Years was {years}");
    }
}
