//! HTML parsing for Billboard chart pages.
//!
//! The parser turns a page into [`RawRow`]s, one per ranked item, plus the
//! publication date. It does not build entities; rows that lack a title or
//! an artist are dropped here and counted, everything else is left to the
//! provider.

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;

use crate::config::ParserBackend;
use crate::error::{ChartError, Result};
use crate::models::ChartType;

/// Status labels that can sit in a `c-label` span but are never artists.
const MARKERS: &[&str] = &["NEW", "RE-ENTRY", "RE- ENTRY", "-"];

/// Image attributes in lookup order; lazy-loaded images keep the real URL
/// in a data attribute and a placeholder in `src`.
const IMAGE_ATTRS: &[&str] = &["data-lazy-src", "data-src", "data-original", "src"];

const MONTHS: &[&str] = &[
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

/// Fields extracted from one chart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub rank: u32,
    pub title: String,
    /// Primary artist.
    pub artist: String,
    pub artists: Vec<String>,
    pub image: Option<String>,
    pub weeks_on_chart: u32,
    /// 0 when the row has no previous rank.
    pub last_week: u32,
    pub peak_position: u32,
}

/// Result of parsing one chart page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// `None` when no date marker could be read.
    pub published_date: Option<NaiveDate>,
    pub rows: Vec<RawRow>,
    /// Number of row containers found, parsable or not.
    pub total_rows: usize,
}

#[derive(Debug, Error)]
enum RowError {
    #[error("row has no title")]
    MissingTitle,
    #[error("row has no artist")]
    MissingArtist,
}

/// Parser for Billboard chart pages.
#[derive(Debug, Clone)]
pub struct ChartPageParser {
    backend: ParserBackend,
    include_images: bool,
    row: Selector,
    label: Selector,
    title: Selector,
    artist_link: Selector,
    image: Selector,
    last_week: Regex,
    peak: Regex,
    weeks_label: Regex,
    weeks_text: Regex,
    date_long: Regex,
    date_short: Regex,
    credit_separator: Regex,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ChartError::ParseFailure {
        provider: "billboard".to_string(),
        chart: String::new(),
        reason: format!("invalid selector '{}': {}", css, e),
    })
}

fn regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ChartError::ParseFailure {
        provider: "billboard".to_string(),
        chart: String::new(),
        reason: format!("invalid pattern '{}': {}", pattern, e),
    })
}

/// Text of an element with whitespace collapsed.
fn element_text(element: &ElementRef) -> String {
    normalize_space(&element.text().collect::<Vec<_>>().join(" "))
}

fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn capture_u32(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

impl ChartPageParser {
    pub fn new(backend: ParserBackend, include_images: bool) -> Result<Self> {
        Ok(Self {
            backend,
            include_images,
            row: selector("ul.o-chart-results-list-row")?,
            label: selector("span.c-label")?,
            title: selector("h3.c-title")?,
            artist_link: selector("a[href*=\"/artist/\"]")?,
            image: selector("img")?,
            last_week: regex(r"(?i)\bLW\b[:\s]*(\d+)")?,
            peak: regex(r"(?i)\bPEAK(?:\s+POS\.?)?[:\s]*(\d+)")?,
            weeks_label: regex(r"(?i)\bWKS(?:\s+ON\s+CHART)?[:\s]*(\d+)")?,
            weeks_text: regex(r"(?i)(\d+)\s+weeks?\b")?,
            date_long: regex(r"(?i)Week of\s+([A-Za-z]+)\s+(\d{1,2}),\s+(\d{4})")?,
            date_short: regex(r"(?i)Week of\s+(\d{1,2})/(\d{1,2})/(\d{4})")?,
            credit_separator: regex(r"(?i)\s*(?:&|,|\bfeaturing\b|\bfeat\.)\s*")?,
        })
    }

    /// Parse a whole page for a chart of `chart_type`.
    pub fn parse(&self, html: &str, chart_type: ChartType) -> ParsedPage {
        let document = match self.backend {
            ParserBackend::Document => Html::parse_document(html),
            ParserBackend::Fragment => Html::parse_fragment(html),
        };

        let page_text = element_text(&document.root_element());
        let published_date = self.parse_date(&page_text);

        let mut rows = Vec::new();
        let mut total_rows = 0;
        for (index, row) in document.select(&self.row).enumerate() {
            total_rows += 1;
            let ordinal = u32::try_from(index + 1).unwrap_or(u32::MAX);
            match self.parse_row(&row, ordinal, chart_type) {
                Ok(raw) => rows.push(raw),
                Err(e) => debug!("Skipping chart row {}: {}", ordinal, e),
            }
        }

        debug!("Parsed {} of {} chart rows", rows.len(), total_rows);
        ParsedPage {
            published_date,
            rows,
            total_rows,
        }
    }

    fn parse_row(
        &self,
        row: &ElementRef,
        ordinal: u32,
        chart_type: ChartType,
    ) -> std::result::Result<RawRow, RowError> {
        let rank = self.extract_rank(row).unwrap_or(ordinal);

        let title = row
            .select(&self.title)
            .next()
            .map(|h3| element_text(&h3))
            .filter(|t| !t.is_empty())
            .ok_or(RowError::MissingTitle)?;

        let credit = self
            .extract_artist(row, &title, chart_type)
            .ok_or(RowError::MissingArtist)?;
        let artists = self.split_artists(&credit);
        let artist = artists.first().cloned().unwrap_or_else(|| credit.clone());

        let image = if self.include_images {
            self.extract_image(row)
        } else {
            None
        };

        let row_text = element_text(row);
        let last_week = capture_u32(&self.last_week, &row_text).unwrap_or(0);
        let peak_position = capture_u32(&self.peak, &row_text).unwrap_or(rank);
        let weeks_on_chart = capture_u32(&self.weeks_label, &row_text)
            .or_else(|| capture_u32(&self.weeks_text, &row_text))
            .unwrap_or(1);

        Ok(RawRow {
            rank,
            title,
            artist,
            artists,
            image,
            weeks_on_chart,
            last_week,
            peak_position,
        })
    }

    /// Rank label of the row: its first label, when numeric.
    ///
    /// Later numeric labels hold LW/PEAK/WKS stats and never stand in for
    /// the rank.
    fn extract_rank(&self, row: &ElementRef) -> Option<u32> {
        row.select(&self.label)
            .next()
            .map(|span| element_text(&span))
            .filter(|text| is_number(text))
            .and_then(|text| text.parse().ok())
    }

    /// Artist credit of the row.
    ///
    /// Artist page links win; otherwise the best label candidate is used,
    /// preferring labels wrapped in a link.
    fn extract_artist(&self, row: &ElementRef, title: &str, chart_type: ChartType) -> Option<String> {
        let linked: Vec<String> = row
            .select(&self.artist_link)
            .map(|a| element_text(&a))
            .filter(|text| !text.is_empty())
            // Album titles may repeat the artist name (self-titled albums).
            .filter(|text| chart_type == ChartType::Album || text != title)
            .collect();
        if !linked.is_empty() {
            return Some(linked.join(" & "));
        }

        let mut fallback = None;
        for span in row.select(&self.label) {
            let text = element_text(&span);
            let len = text.chars().count();
            if is_number(&text) || text == title || len <= 2 || len >= 150 {
                continue;
            }
            if MARKERS.contains(&text.to_uppercase().as_str()) {
                continue;
            }

            let in_link = span
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|el| el.value().name() == "a");
            if in_link {
                return Some(text);
            }

            let looks_like_name = text.contains('&')
                || text.contains(',')
                || len > 8
                || text.chars().next().is_some_and(char::is_uppercase);
            if looks_like_name && fallback.is_none() {
                fallback = Some(text);
            }
        }
        fallback
    }

    /// Split a credit such as `A Featuring B & C` into artist names.
    pub fn split_artists(&self, credit: &str) -> Vec<String> {
        self.credit_separator
            .split(credit)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn extract_image(&self, row: &ElementRef) -> Option<String> {
        let img = row.select(&self.image).next()?;
        IMAGE_ATTRS
            .iter()
            .filter_map(|attr| img.value().attr(attr))
            .find(|url| url.starts_with("http") && !url.contains("lazyload-fallback"))
            .map(str::to_string)
    }

    /// Read the `Week of ...` marker of the page.
    fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        if let Some(caps) = self.date_long.captures(text) {
            let month = MONTHS
                .iter()
                .position(|m| m.eq_ignore_ascii_case(&caps[1]))
                .map(|i| i as u32 + 1);
            let day = caps[2].parse().ok();
            let year = caps[3].parse().ok();
            if let (Some(month), Some(day), Some(year)) = (month, day, year) {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    return Some(date);
                }
            }
        }

        let caps = self.date_short.captures(text)?;
        let month = caps[1].parse().ok()?;
        let day = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ChartPageParser {
        ChartPageParser::new(ParserBackend::Document, true).unwrap()
    }

    const ROW: &str = r#"
        <html><body>
        <p>Week of January 10, 2026</p>
        <div class="chart-results-list">
          <ul class="o-chart-results-list-row">
            <li><span class="c-label">1</span></li>
            <li>
              <img src="https://www.billboard.com/assets/lazyload-fallback.gif"
                   data-lazy-src="https://charts-static.billboard.com/img/anti-hero.jpg">
              <h3 class="c-title"> Anti-Hero </h3>
              <span class="c-label">Taylor Swift</span>
            </li>
            <li><span>LW</span><span class="c-label">2</span></li>
            <li><span>PEAK</span><span class="c-label">1</span></li>
            <li><span>WKS</span><span class="c-label">12</span></li>
          </ul>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_row_fields() {
        let page = parser().parse(ROW, ChartType::Single);
        assert_eq!(page.total_rows, 1);
        assert_eq!(page.published_date, NaiveDate::from_ymd_opt(2026, 1, 10));

        let row = &page.rows[0];
        assert_eq!(row.rank, 1);
        assert_eq!(row.title, "Anti-Hero");
        assert_eq!(row.artist, "Taylor Swift");
        assert_eq!(row.artists, vec!["Taylor Swift".to_string()]);
        assert_eq!(
            row.image.as_deref(),
            Some("https://charts-static.billboard.com/img/anti-hero.jpg")
        );
        assert_eq!(row.last_week, 2);
        assert_eq!(row.peak_position, 1);
        assert_eq!(row.weeks_on_chart, 12);
    }

    #[test]
    fn test_images_skipped_when_disabled() {
        let parser = ChartPageParser::new(ParserBackend::Document, false).unwrap();
        let page = parser.parse(ROW, ChartType::Single);
        assert_eq!(page.rows[0].image, None);
    }

    #[test]
    fn test_fragment_backend_matches_document() {
        let document = parser().parse(ROW, ChartType::Single);
        let fragment = ChartPageParser::new(ParserBackend::Fragment, true)
            .unwrap()
            .parse(ROW, ChartType::Single);
        assert_eq!(document, fragment);
    }

    #[test]
    fn test_defaults_for_missing_stats() {
        let html = r#"
            <ul class="o-chart-results-list-row">
              <li><span class="c-label">7</span></li>
              <li><h3 class="c-title">Fresh</h3><span class="c-label">New Artist</span></li>
              <li><span class="c-label">NEW</span></li>
            </ul>
        "#;
        let page = parser().parse(html, ChartType::Single);
        let row = &page.rows[0];
        assert_eq!(row.rank, 7);
        assert_eq!(row.last_week, 0);
        assert_eq!(row.peak_position, 7);
        assert_eq!(row.weeks_on_chart, 1);
        assert_eq!(page.published_date, None);
    }

    #[test]
    fn test_rank_falls_back_to_row_position() {
        let html = r#"
            <ul class="o-chart-results-list-row">
              <li><h3 class="c-title">First</h3><span class="c-label">Artist One</span></li>
            </ul>
            <ul class="o-chart-results-list-row">
              <li><h3 class="c-title">Second</h3><span class="c-label">Artist Two</span></li>
            </ul>
        "#;
        let page = parser().parse(html, ChartType::Single);
        let ranks: Vec<u32> = page.rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
    }

    #[test]
    fn test_stat_labels_never_become_rank() {
        let html = r#"
            <ul class="o-chart-results-list-row">
              <li><span class="c-label">1</span></li>
              <li><h3 class="c-title">First</h3><span class="c-label">Artist One</span></li>
              <li><span>LW</span><span class="c-label">1</span></li>
            </ul>
            <ul class="o-chart-results-list-row">
              <li><h3 class="c-title">Second</h3><span class="c-label">Artist Two</span></li>
              <li><span>LW</span><span class="c-label">57</span></li>
              <li><span>PEAK</span><span class="c-label">40</span></li>
            </ul>
        "#;
        let page = parser().parse(html, ChartType::Single);
        let ranks: Vec<u32> = page.rows.iter().map(|r| r.rank).collect();
        let last_weeks: Vec<u32> = page.rows.iter().map(|r| r.last_week).collect();
        assert_eq!(ranks, vec![1, 2]);
        assert_eq!(last_weeks, vec![1, 57]);
        assert_eq!(page.rows[1].peak_position, 40);
    }

    #[test]
    fn test_artist_links_take_priority() {
        let html = r#"
            <ul class="o-chart-results-list-row">
              <li><span class="c-label">3</span></li>
              <li>
                <h3 class="c-title">Kill Bill</h3>
                <a href="/artist/sza/">SZA</a>
                <a href="/artist/doja-cat/">Doja Cat</a>
                <span class="c-label">Somebody Else</span>
              </li>
            </ul>
        "#;
        let page = parser().parse(html, ChartType::Single);
        assert_eq!(page.rows[0].artist, "SZA");
        assert_eq!(page.rows[0].artists, vec!["SZA", "Doja Cat"]);
    }

    #[test]
    fn test_self_titled_album_keeps_artist_link() {
        let html = r#"
            <ul class="o-chart-results-list-row">
              <li><span class="c-label">1</span></li>
              <li><h3 class="c-title">Weezer</h3><a href="/artist/weezer/">Weezer</a></li>
            </ul>
        "#;
        let album_page = parser().parse(html, ChartType::Album);
        assert_eq!(album_page.rows[0].artist, "Weezer");

        let single_page = parser().parse(html, ChartType::Single);
        assert!(single_page.rows.is_empty());
        assert_eq!(single_page.total_rows, 1);
    }

    #[test]
    fn test_rows_without_title_are_dropped() {
        let html = r#"
            <ul class="o-chart-results-list-row">
              <li><span class="c-label">1</span><span class="c-label">Lonely Artist</span></li>
            </ul>
        "#;
        let page = parser().parse(html, ChartType::Single);
        assert!(page.rows.is_empty());
        assert_eq!(page.total_rows, 1);
    }

    #[test]
    fn test_split_artists() {
        let parser = parser();
        assert_eq!(parser.split_artists("Artist A & Artist B"), vec!["Artist A", "Artist B"]);
        assert_eq!(parser.split_artists("Artist A, Artist B"), vec!["Artist A", "Artist B"]);
        assert_eq!(
            parser.split_artists("Morgan Wallen Featuring Post Malone"),
            vec!["Morgan Wallen", "Post Malone"]
        );
        assert_eq!(parser.split_artists("Lil Nas X"), vec!["Lil Nas X"]);
        assert_eq!(parser.split_artists("Solo Artist"), vec!["Solo Artist"]);
    }

    #[test]
    fn test_parse_short_date() {
        let parser = parser();
        assert_eq!(
            parser.parse_date("Chart Week of 1/10/2026"),
            NaiveDate::from_ymd_opt(2026, 1, 10)
        );
        assert_eq!(parser.parse_date("Week of Smarch 40, 2026"), None);
        assert_eq!(parser.parse_date("no marker"), None);
    }
}
