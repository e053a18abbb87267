//! Orchestration of one bulk import run.
//!
//! Rows are processed strictly in file order. Validation and resolution
//! happen in the domain; each surviving row is handed to the writer as one
//! atomic bundle. A failing row is recorded and the batch continues.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::domain::catalog::{AttributeKind, ProductDraft, VariantDraft};
use crate::domain::error::Error;
use crate::domain::import::parser::{ParsedRow, parse_csv};
use crate::domain::import::report::ImportReport;
use crate::domain::import::resolver::AttributeIndex;
use crate::domain::import::row::{RowError, ValidatedRow, validate_row};
use crate::domain::ports::{AttributeRepository, ImportWriter, ProductImportBundle};
use crate::domain::slug::{synthetic_sku, unique_slug};

/// Runs bulk CSV imports against the attribute index and the import writer.
pub struct ImportService {
    writer: Arc<dyn ImportWriter>,
    attributes: Arc<dyn AttributeRepository>,
}

impl ImportService {
    pub fn new(writer: Arc<dyn ImportWriter>, attributes: Arc<dyn AttributeRepository>) -> Self {
        Self { writer, attributes }
    }

    /// Run one upload end to end and return the aggregated report.
    ///
    /// Structural CSV failures and an unreachable attribute store fail the
    /// whole request; everything else is reported per row.
    pub async fn run(&self, bytes: &[u8]) -> Result<ImportReport, Error> {
        let rows = parse_csv(bytes).map_err(|err| Error::invalid_request(err.to_string()))?;

        let refs = self.attributes.load_index().await.map_err(|err| {
            tracing::error!(error = %err, "attribute index load failed");
            Error::service_unavailable("attribute reference data is unavailable")
        })?;
        let index = AttributeIndex::from_refs(&refs);

        let mut rng = SmallRng::from_entropy();
        let mut report = ImportReport::new();
        for row in &rows {
            match self.import_row(row, &index, &mut rng, &mut report).await {
                Ok(()) => report.record_success(),
                Err(error) => {
                    tracing::warn!(
                        row = error.row,
                        field = %error.field,
                        message = %error.message,
                        "import row rejected"
                    );
                    report.record_error(error);
                }
            }
        }
        Ok(report)
    }

    async fn import_row(
        &self,
        row: &ParsedRow,
        index: &AttributeIndex,
        rng: &mut SmallRng,
        report: &mut ImportReport,
    ) -> Result<(), RowError> {
        let validated = validate_row(row)?;
        let bundle = build_bundle(&validated, index, rng, report);

        self.writer.create_product(&bundle).await.map_err(|err| {
            RowError::new(validated.number, "database", err.to_string())
        })?;
        Ok(())
    }
}

fn build_bundle(
    validated: &ValidatedRow,
    index: &AttributeIndex,
    rng: &mut SmallRng,
    report: &mut ImportReport,
) -> ProductImportBundle {
    let (attributes, unresolved) = index.resolve_all(&validated.attribute_tokens);
    for (kind, token) in unresolved {
        report.add_warning(format!(
            "row {}: unknown {kind} '{token}'",
            validated.number
        ));
    }

    let slug = unique_slug(&validated.name, rng);
    let has_variants = validated.variants.len() > 1;

    let variants: Vec<VariantDraft> = validated
        .variants
        .iter()
        .enumerate()
        .map(|(position, spec)| {
            let color_id = spec.color_token.as_deref().and_then(|token| {
                let resolved = index.resolve(AttributeKind::Color, token);
                if resolved.is_none() {
                    report.add_warning(format!(
                        "row {}: unknown color '{token}'",
                        validated.number
                    ));
                }
                resolved
            });
            VariantDraft {
                sku: synthetic_sku(&slug, position, rng),
                size_label: spec.size_label.clone(),
                price_cents: spec.price_cents,
                compare_at_price_cents: spec.compare_at_price_cents,
                stock_quantity: spec.stock_quantity,
                color_id,
                is_active: true,
                sort_order: i32::try_from(position).unwrap_or(i32::MAX),
            }
        })
        .collect();

    // The product carries the first variant's price; its own stock is only
    // meaningful when there is a single variant.
    let product = ProductDraft {
        slug,
        name: validated.name.clone(),
        description: validated.description.clone(),
        kind: validated.kind,
        material: validated.material.clone(),
        price_cents: variants.first().map_or(0, |v| v.price_cents),
        compare_at_price_cents: variants.first().and_then(|v| v.compare_at_price_cents),
        stock_quantity: if has_variants {
            0
        } else {
            variants.first().map_or(0, |v| v.stock_quantity)
        },
        is_featured: validated.is_featured,
        is_active: validated.is_active,
    };

    ProductImportBundle {
        product,
        variants,
        attributes,
        image_urls: validated.image_urls.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use uuid::Uuid;

    use crate::domain::catalog::AttributeRef;
    use crate::domain::import::row::DEFAULT_PLANT_SIZE;
    use crate::domain::ports::{
        ImportWriterError, MockAttributeRepository, MockImportWriter,
    };

    fn attribute_refs() -> Vec<AttributeRef> {
        vec![
            AttributeRef {
                kind: AttributeKind::Category,
                id: Uuid::new_v4(),
                slug: "living-room".into(),
                name: "Living Room".into(),
            },
            AttributeRef {
                kind: AttributeKind::Color,
                id: Uuid::new_v4(),
                slug: "deep-red".into(),
                name: "Deep Red".into(),
            },
        ]
    }

    /// Service whose writer records every bundle it receives.
    fn recording_service(
        refs: Vec<AttributeRef>,
    ) -> (ImportService, Arc<Mutex<Vec<ProductImportBundle>>>) {
        let bundles = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&bundles);
        let mut writer = MockImportWriter::new();
        writer.expect_create_product().returning(move |bundle| {
            sink.lock().unwrap().push(bundle.clone());
            Ok(Uuid::new_v4())
        });
        let mut attributes = MockAttributeRepository::new();
        attributes
            .expect_load_index()
            .return_once(move || Ok(refs));
        (
            ImportService::new(Arc::new(writer), Arc::new(attributes)),
            bundles,
        )
    }

    fn rejecting_service() -> ImportService {
        let mut writer = MockImportWriter::new();
        writer.expect_create_product().never();
        let mut attributes = MockAttributeRepository::new();
        attributes
            .expect_load_index()
            .returning(|| Ok(Vec::new()));
        ImportService::new(Arc::new(writer), Arc::new(attributes))
    }

    #[tokio::test]
    async fn mismatched_lengths_write_nothing() {
        let service = rejecting_service();
        let csv = b"name,product_type,sizes,prices\nRug,carpet,160\xc3\x97230|200\xc3\x97290,1500\n";
        let report = service.run(csv).await.expect("report");
        assert_eq!(report.success_count, 0);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.errors[0].field, "variants");
    }

    #[tokio::test]
    async fn unknown_product_type_writes_nothing() {
        let service = rejecting_service();
        let csv = b"name,product_type,sizes,prices\nThing,furniture,160,1500\n";
        let report = service.run(csv).await.expect("report");
        assert_eq!(report.errors[0].field, "product_type");
    }

    #[tokio::test]
    async fn carpet_without_sizes_writes_nothing() {
        let service = rejecting_service();
        let csv = b"name,product_type,sizes,prices\nRug,carpet,,1500\n";
        let report = service.run(csv).await.expect("report");
        assert_eq!(report.errors[0].field, "sizes");
    }

    #[tokio::test]
    async fn plant_without_sizes_gets_one_default_variant() {
        let (service, bundles) = recording_service(Vec::new());
        let csv = b"name,product_type,prices\nMonstera,plant,45\n";
        let report = service.run(csv).await.expect("report");
        assert_eq!(report.success_count, 1);

        let bundles = bundles.lock().unwrap();
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].variants.len(), 1);
        assert_eq!(bundles[0].product.stock_quantity, 0);
        assert_eq!(bundles[0].variants[0].size_label, DEFAULT_PLANT_SIZE);
    }

    #[tokio::test]
    async fn paired_cells_become_variants_in_supplied_order() {
        let (service, bundles) = recording_service(Vec::new());
        let csv = b"name,product_type,sizes,prices,stock_quantities\n\
Rug,carpet,160\xc3\x97230|200\xc3\x97290,1500|2000,10|5\n";
        let report = service.run(csv).await.expect("report");
        assert_eq!(report.success_count, 1);

        let bundles = bundles.lock().unwrap();
        let variants = &bundles[0].variants;
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].size_label, "160×230");
        assert_eq!(variants[0].price_cents, 150_000);
        assert_eq!(variants[0].stock_quantity, 10);
        assert_eq!(variants[0].sort_order, 0);
        assert_eq!(variants[1].size_label, "200×290");
        assert_eq!(variants[1].price_cents, 200_000);
        assert_eq!(variants[1].stock_quantity, 5);
        assert_eq!(variants[1].sort_order, 1);
    }

    #[tokio::test]
    async fn unresolved_tokens_warn_but_do_not_fail_the_row() {
        let (service, bundles) = recording_service(attribute_refs());
        let csv = b"name,product_type,sizes,prices,categories\n\
Rug,carpet,160,1500,\"Living Room, Spaceship\"\n";
        let report = service.run(csv).await.expect("report");
        assert_eq!(report.success_count, 1);
        assert_eq!(report.error_count, 0);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Spaceship"));

        let bundles = bundles.lock().unwrap();
        // Only the resolvable token produced an association.
        assert_eq!(bundles[0].attributes.len(), 1);
        assert_eq!(bundles[0].attributes[0].0, AttributeKind::Category);
    }

    #[tokio::test]
    async fn variant_colors_resolve_against_the_color_table() {
        let refs = attribute_refs();
        let color_id = refs[1].id;
        let (service, bundles) = recording_service(refs);
        let csv = b"name,product_type,sizes,prices,variant_colors\n\
Rug,carpet,160|200,1500|2000,Deep Red|teal\n";
        let report = service.run(csv).await.expect("report");
        assert_eq!(report.success_count, 1);
        assert!(report.warnings.iter().any(|w| w.contains("teal")));

        let bundles = bundles.lock().unwrap();
        assert_eq!(bundles[0].variants[0].color_id, Some(color_id));
        assert_eq!(bundles[0].variants[1].color_id, None);
    }

    #[tokio::test]
    async fn mixed_batch_reports_per_row_and_continues() {
        let (service, bundles) = recording_service(Vec::new());
        let csv = b"name,product_type,sizes,prices\n\
Rug,carpet,160\xc3\x97230|200\xc3\x97290,1500|2000\n\
Bare,carpet,160,\n";
        let report = service.run(csv).await.expect("report");
        assert_eq!(report.success_count, 1);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.errors[0].row, 3);
        assert_eq!(report.errors[0].field, "prices");
        assert!(!report.success);

        let bundles = bundles.lock().unwrap();
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].variants.len(), 2);
    }

    #[tokio::test]
    async fn writer_failure_is_recorded_and_the_batch_continues() {
        let bundles = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&bundles);
        let mut writer = MockImportWriter::new();
        let mut first = true;
        writer.expect_create_product().returning(move |bundle| {
            if first {
                first = false;
                Err(ImportWriterError::write("duplicate slug"))
            } else {
                sink.lock().unwrap().push(bundle.clone());
                Ok(Uuid::new_v4())
            }
        });
        let mut attributes = MockAttributeRepository::new();
        attributes
            .expect_load_index()
            .returning(|| Ok(Vec::new()));
        let service = ImportService::new(Arc::new(writer), Arc::new(attributes));

        let csv = b"name,product_type,sizes,prices\n\
First,carpet,160,1500\n\
Second,carpet,160,1500\n";
        let report = service.run(csv).await.expect("report");
        assert_eq!(report.success_count, 1);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.errors[0].field, "database");
        assert_eq!(bundles.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn structural_csv_failure_fails_the_request() {
        let service = rejecting_service();
        let result = service.run(b"name,prices\n\"Rug,10\n").await;
        assert!(result.is_err());
    }
}
