//! Per-row validation for the bulk product import.
//!
//! A failing row is reported and skipped; it never aborts the batch and
//! never reaches the writer.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::catalog::{AttributeKind, ProductKind};
use crate::domain::import::parser::ParsedRow;
use crate::domain::money::parse_cents;

/// Size label given to the synthetic variant of a plant row with no sizes.
pub const DEFAULT_PLANT_SIZE: &str = "Standard";

/// One recorded row failure, surfaced verbatim in the import report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl RowError {
    pub fn new(row: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// One variant derived from the parallel size/price/stock/color cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    pub size_label: String,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub stock_quantity: i32,
    /// Unresolved color token; the resolver maps it to a color id.
    pub color_token: Option<String>,
}

/// A row that passed validation, ready for attribute resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRow {
    pub number: usize,
    pub name: String,
    pub description: String,
    pub kind: ProductKind,
    pub material: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
    pub variants: Vec<VariantSpec>,
    /// Association tokens per applicable attribute kind, comma split.
    pub attribute_tokens: Vec<(AttributeKind, Vec<String>)>,
    pub image_urls: Vec<String>,
}

fn split_pipe(cell: &str) -> Vec<String> {
    cell.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

fn split_comma(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_flag(row: &ParsedRow, field: &str, default: bool) -> Result<bool, RowError> {
    let cell = row.get(field).trim();
    if cell.is_empty() {
        return Ok(default);
    }
    match cell.to_lowercase().as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        other => Err(RowError::new(
            row.number,
            field,
            format!("expected yes or no, got '{other}'"),
        )),
    }
}

fn optional_cell(row: &ParsedRow, field: &str) -> Option<String> {
    let cell = row.get(field).trim();
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_owned())
    }
}

/// Check a pipe-split cell against the number of sizes.
fn check_parallel(
    row: &ParsedRow,
    field: &str,
    len: usize,
    sizes: usize,
) -> Result<(), RowError> {
    if len == sizes {
        Ok(())
    } else {
        Err(RowError::new(
            row.number,
            "variants",
            format!("{field} lists {len} values but sizes lists {sizes}"),
        ))
    }
}

/// Validate one parsed row into a [`ValidatedRow`].
pub fn validate_row(row: &ParsedRow) -> Result<ValidatedRow, RowError> {
    let name = row.get("name").trim().to_owned();
    if name.is_empty() {
        return Err(RowError::new(row.number, "name", "name is required"));
    }

    let kind_cell = row.get("product_type").trim().to_lowercase();
    let Some(kind) = ProductKind::from_token(&kind_cell) else {
        return Err(RowError::new(
            row.number,
            "product_type",
            format!("expected carpet or plant, got '{kind_cell}'"),
        ));
    };

    let prices_cell = row.get("prices").trim();
    if prices_cell.is_empty() {
        return Err(RowError::new(row.number, "prices", "prices is required"));
    }

    let mut sizes = split_pipe(row.get("sizes"));
    if sizes.is_empty() {
        match kind {
            // A plant with no listed sizes sells in one default size.
            ProductKind::Plant => sizes.push(DEFAULT_PLANT_SIZE.to_owned()),
            ProductKind::Carpet => {
                return Err(RowError::new(
                    row.number,
                    "sizes",
                    "sizes is required for carpet rows",
                ));
            }
        }
    }

    let prices = split_pipe(prices_cell);
    check_parallel(row, "prices", prices.len(), sizes.len())?;
    let mut price_cents = Vec::with_capacity(prices.len());
    for raw in &prices {
        let cents = parse_cents(raw)
            .map_err(|err| RowError::new(row.number, "prices", err.to_string()))?;
        price_cents.push(cents);
    }

    let compare_cells = split_pipe(row.get("compare_prices"));
    let compare_cents: Vec<Option<i64>> = if compare_cells.is_empty() {
        vec![None; sizes.len()]
    } else {
        check_parallel(row, "compare_prices", compare_cells.len(), sizes.len())?;
        let mut parsed = Vec::with_capacity(compare_cells.len());
        for raw in &compare_cells {
            let cents = parse_cents(raw)
                .map_err(|err| RowError::new(row.number, "compare_prices", err.to_string()))?;
            parsed.push(Some(cents));
        }
        parsed
    };

    let stock_cells = split_pipe(row.get("stock_quantities"));
    let stock: Vec<i32> = if stock_cells.is_empty() {
        vec![0; sizes.len()]
    } else {
        check_parallel(row, "stock_quantities", stock_cells.len(), sizes.len())?;
        let mut parsed = Vec::with_capacity(stock_cells.len());
        for raw in &stock_cells {
            let quantity: i32 = raw.parse().map_err(|_| {
                RowError::new(
                    row.number,
                    "stock_quantities",
                    format!("not a whole number: '{raw}'"),
                )
            })?;
            if quantity < 0 {
                return Err(RowError::new(
                    row.number,
                    "stock_quantities",
                    "stock must not be negative",
                ));
            }
            parsed.push(quantity);
        }
        parsed
    };

    let color_cells = split_pipe(row.get("variant_colors"));
    let colors: Vec<Option<String>> = if color_cells.is_empty() {
        vec![None; sizes.len()]
    } else {
        check_parallel(row, "variant_colors", color_cells.len(), sizes.len())?;
        color_cells.into_iter().map(Some).collect()
    };

    let variants = sizes
        .into_iter()
        .zip(price_cents)
        .zip(compare_cents)
        .zip(stock)
        .zip(colors)
        .map(
            |((((size_label, price_cents), compare_at_price_cents), stock_quantity), color_token)| {
                VariantSpec {
                    size_label,
                    price_cents,
                    compare_at_price_cents,
                    stock_quantity,
                    color_token,
                }
            },
        )
        .collect();

    let attribute_tokens = AttributeKind::applicable_to(kind)
        .iter()
        .map(|attribute| (*attribute, split_comma(row.get(attribute.csv_column()))))
        .filter(|(_, tokens)| !tokens.is_empty())
        .collect();

    Ok(ValidatedRow {
        number: row.number,
        name,
        description: row.get("description").trim().to_owned(),
        kind,
        material: optional_cell(row, "material"),
        is_featured: parse_flag(row, "is_featured", false)?,
        is_active: parse_flag(row, "is_active", true)?,
        variants,
        attribute_tokens,
        image_urls: split_pipe(row.get("image_urls")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn carpet_row(pairs: &[(&str, &str)]) -> ParsedRow {
        let mut all = vec![
            ("name", "Persian Garden Rug"),
            ("product_type", "carpet"),
            ("sizes", "160×230|200×290"),
            ("prices", "1500|2000"),
        ];
        for (key, value) in pairs.iter().copied() {
            if let Some(existing) = all.iter_mut().find(|(k, _)| *k == key) {
                existing.1 = value;
            } else {
                all.push((key, value));
            }
        }
        ParsedRow::from_pairs(2, &all)
    }

    #[test]
    fn two_sizes_two_prices_yields_two_variants_in_order() {
        let row = carpet_row(&[("stock_quantities", "10|5")]);
        let validated = validate_row(&row).expect("valid");
        assert_eq!(validated.variants.len(), 2);
        assert_eq!(validated.variants[0].size_label, "160×230");
        assert_eq!(validated.variants[0].price_cents, 150_000);
        assert_eq!(validated.variants[0].stock_quantity, 10);
        assert_eq!(validated.variants[1].size_label, "200×290");
        assert_eq!(validated.variants[1].price_cents, 200_000);
        assert_eq!(validated.variants[1].stock_quantity, 5);
    }

    #[test]
    fn size_price_mismatch_is_a_variants_error() {
        let row = carpet_row(&[("prices", "1500")]);
        let err = validate_row(&row).expect_err("mismatch");
        assert_eq!(err.field, "variants");
        assert_eq!(err.row, 2);
    }

    #[test]
    fn unknown_product_type_is_rejected() {
        let row = carpet_row(&[("product_type", "furniture")]);
        let err = validate_row(&row).expect_err("bad kind");
        assert_eq!(err.field, "product_type");
    }

    #[test]
    fn missing_prices_is_a_prices_error() {
        let row = carpet_row(&[("prices", "")]);
        let err = validate_row(&row).expect_err("no prices");
        assert_eq!(err.field, "prices");
    }

    #[test]
    fn carpet_without_sizes_is_rejected() {
        let row = carpet_row(&[("sizes", ""), ("prices", "1500")]);
        let err = validate_row(&row).expect_err("no sizes");
        assert_eq!(err.field, "sizes");
    }

    #[test]
    fn plant_without_sizes_gets_the_default_size() {
        let row = ParsedRow::from_pairs(
            3,
            &[
                ("name", "Monstera"),
                ("product_type", "plant"),
                ("prices", "45"),
            ],
        );
        let validated = validate_row(&row).expect("valid");
        assert_eq!(validated.variants.len(), 1);
        assert_eq!(validated.variants[0].size_label, DEFAULT_PLANT_SIZE);
        assert_eq!(validated.variants[0].price_cents, 4_500);
    }

    #[test]
    fn variant_colors_must_be_parallel_to_sizes() {
        let row = carpet_row(&[("variant_colors", "red")]);
        let err = validate_row(&row).expect_err("mismatch");
        assert_eq!(err.field, "variants");
    }

    #[test]
    fn attribute_tokens_follow_the_product_family() {
        let row = carpet_row(&[
            ("categories", "modern, classic"),
            ("plant_types", "fern"),
        ]);
        let validated = validate_row(&row).expect("valid");
        let kinds: Vec<_> = validated
            .attribute_tokens
            .iter()
            .map(|(kind, _)| *kind)
            .collect();
        assert!(kinds.contains(&AttributeKind::Category));
        // Plant columns are ignored on carpet rows.
        assert!(!kinds.contains(&AttributeKind::PlantType));
        let (_, categories) = &validated.attribute_tokens[0];
        assert_eq!(categories, &vec!["modern".to_owned(), "classic".to_owned()]);
    }

    #[rstest]
    #[case("yes", true)]
    #[case("No", false)]
    #[case("", false)]
    fn featured_flag_parses(#[case] cell: &str, #[case] expected: bool) {
        let row = carpet_row(&[("is_featured", cell)]);
        assert_eq!(validate_row(&row).expect("valid").is_featured, expected);
    }

    #[test]
    fn bad_flag_value_is_reported() {
        let row = carpet_row(&[("is_active", "maybe")]);
        let err = validate_row(&row).expect_err("bad flag");
        assert_eq!(err.field, "is_active");
    }

    #[test]
    fn blank_name_is_rejected() {
        let row = carpet_row(&[("name", "  ")]);
        assert_eq!(validate_row(&row).expect_err("no name").field, "name");
    }
}
