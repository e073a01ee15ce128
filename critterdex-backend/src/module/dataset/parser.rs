///! Wiki creature table parser
///!
///! Turns a locally saved copy of the wiki's fish or bug list page into
///! records. Column layout of the first sortable table:
///!   fish: name, image, price, location, shadow, time, Jan..Dec
///!   bugs: name, image, price, location, time, Jan..Dec

use critterdex_common::{Record, Species, MONTH_COUNT, UNKNOWN_CELL};
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use crate::error::{CritterError, CritterResult};

const WIKI_BASE_URL: &str = "https://animalcrossing.fandom.com";

/// Marker the wiki puts in a month cell when the creature is present
const MONTH_CHECK: &str = "✓";

/// Placeholder rows the wiki keeps for undiscovered entries
const PLACEHOLDER_NAME: &str = "Unknown";

fn selector(css: &str) -> CritterResult<Selector> {
    Selector::parse(css).map_err(|e| CritterError::Selector(format!("{}: {}", css, e)))
}

/// Collapse inner whitespace and trim
fn clean_cell(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn cell_text(cell: &ElementRef) -> String {
    clean_cell(&cell.text().collect::<String>())
}

/// "1,000" → 1000. Zero and garbage mean the price is unknown.
fn parse_price(text: &str) -> Option<u32> {
    text.replace(',', "")
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|p| *p > 0)
}

fn parse_shadow(text: &str) -> Option<String> {
    (!text.is_empty() && text != UNKNOWN_CELL).then(|| text.to_string())
}

fn absolute_url(href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", WIKI_BASE_URL, href)
    } else {
        href.to_string()
    }
}

/// Number of leading columns before the twelve month cells
fn leading_columns(species: Species) -> usize {
    match species {
        Species::Fish => 6,
        Species::Bug => 5,
    }
}

/// Parse the first creature table of a saved wiki page
pub fn parse_wiki_table(html: &str, species: Species) -> CritterResult<Vec<Record>> {
    let document = Html::parse_document(html);

    let table_sel = selector("table.sortable, table.jquery-tablesorter")?;
    let row_sel = selector("tbody tr")?;
    let td_sel = selector("td")?;
    let img_sel = selector("img")?;
    let link_sel = selector("a[href]")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or(CritterError::TableNotFound)?;

    let leading = leading_columns(species);
    let expected = leading + MONTH_COUNT;
    let mut records = Vec::new();

    for tr in table.select(&row_sel) {
        let cells: Vec<ElementRef> = tr.select(&td_sel).collect();

        // Header rows inside tbody only carry <th>
        if cells.is_empty() {
            continue;
        }
        if cells.len() < expected {
            warn!(
                "Skipping malformed {} row ({} of {} columns): {:?}",
                species,
                cells.len(),
                expected,
                cell_text(&cells[0])
            );
            continue;
        }

        let name = cell_text(&cells[0]);
        if name.is_empty() || name == PLACEHOLDER_NAME {
            continue;
        }

        let image = cells[1]
            .select(&img_sel)
            .next()
            .and_then(|img| img.value().attr("data-src").or_else(|| img.value().attr("src")))
            .map(str::to_string);
        let url = cells[0]
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(absolute_url);

        let (shadow_size, time_cell) = match species {
            Species::Fish => (parse_shadow(&cell_text(&cells[4])), &cells[5]),
            Species::Bug => (None, &cells[4]),
        };

        let mut months_available = [false; MONTH_COUNT];
        for (month, cell) in cells[leading..expected].iter().enumerate() {
            months_available[month] = cell_text(cell) == MONTH_CHECK;
        }

        records.push(Record {
            name,
            image,
            price: parse_price(&cell_text(&cells[2])),
            location: cell_text(&cells[3]),
            shadow_size,
            time_range: cell_text(time_cell),
            months_available,
            species,
            url,
        });
    }

    info!("Parsed {} {} records from wiki table", records.len(), species);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn months_html(pattern: &str) -> String {
        pattern
            .chars()
            .map(|c| if c == 'x' { "<td>✓</td>" } else { "<td>-</td>" })
            .collect()
    }

    fn fish_page() -> String {
        format!(
            r#"<html><body>
            <table class="article-table sortable">
              <tbody>
                <tr><th>Name</th><th>Image</th><th>Price</th><th>Location</th><th>Shadow</th><th>Time</th></tr>
                <tr>
                  <td><a href="/wiki/Sea_Bass">Sea   bass</a></td>
                  <td><img src="placeholder.gif" data-src="https://img.invalid/sea_bass.png"></td>
                  <td>400</td>
                  <td> Sea </td>
                  <td>Largest (6)</td>
                  <td>All day</td>
                  {}
                </tr>
                <tr>
                  <td>Coelacanth</td>
                  <td></td>
                  <td>15,000</td>
                  <td>Sea (rainy days)</td>
                  <td>?</td>
                  <td>All day</td>
                  {}
                </tr>
                <tr>
                  <td>Unknown</td><td></td><td>?</td><td>?</td><td>?</td><td>?</td>
                  {}
                </tr>
                <tr><td>Broken</td><td>only three</td><td>cells</td></tr>
              </tbody>
            </table>
            </body></html>"#,
            months_html("xxxx......xx"),
            months_html("xxxxxxxxxxxx"),
            months_html("............"),
        )
    }

    #[test]
    fn test_parse_fish_table() {
        let records = parse_wiki_table(&fish_page(), Species::Fish).unwrap();
        assert_eq!(records.len(), 2);

        let bass = &records[0];
        assert_eq!(bass.name, "Sea bass");
        assert_eq!(bass.image.as_deref(), Some("https://img.invalid/sea_bass.png"));
        assert_eq!(bass.url.as_deref(), Some("https://animalcrossing.fandom.com/wiki/Sea_Bass"));
        assert_eq!(bass.price, Some(400));
        assert_eq!(bass.location, "Sea");
        assert_eq!(bass.shadow_size.as_deref(), Some("Largest (6)"));
        assert_eq!(bass.time_range, "All day");
        assert_eq!(bass.species, Species::Fish);
        assert_eq!(
            bass.months_available,
            [true, true, true, true, false, false, false, false, false, false, true, true]
        );

        let coelacanth = &records[1];
        assert_eq!(coelacanth.price, Some(15000));
        assert_eq!(coelacanth.shadow_size, None);
        assert_eq!(coelacanth.image, None);
        assert_eq!(coelacanth.url, None);
    }

    #[test]
    fn test_parse_bug_table() {
        let html = format!(
            r#"<table class="jquery-tablesorter"><tbody>
              <tr><td>Common butterfly</td><td><img src="https://img.invalid/cb.png"></td><td>160</td>
                  <td>Flying</td><td>4 AM - 7 PM</td>{}</tr>
            </tbody></table>"#,
            months_html("xxxxxx...xxx")
        );
        let records = parse_wiki_table(&html, Species::Bug).unwrap();
        assert_eq!(records.len(), 1);
        let butterfly = &records[0];
        assert_eq!(butterfly.image.as_deref(), Some("https://img.invalid/cb.png"));
        assert_eq!(butterfly.time_range, "4 AM - 7 PM");
        assert_eq!(butterfly.shadow_size, None);
        assert!(butterfly.months_available[0]);
        assert!(!butterfly.months_available[6]);
    }

    #[test]
    fn test_no_table() {
        let err = parse_wiki_table("<html><p>nothing here</p></html>", Species::Fish).unwrap_err();
        assert!(matches!(err, CritterError::TableNotFound));
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("1,000"), Some(1000));
        assert_eq!(parse_price(" 900 "), Some(900));
        assert_eq!(parse_price("?"), None);
        assert_eq!(parse_price("0"), None);
    }
}
