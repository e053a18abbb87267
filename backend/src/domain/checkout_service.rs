//! Checkout orchestration.
//!
//! The client sends cart lines and contact details; everything money-related
//! is recomputed server side from the catalog. The order is persisted before
//! the payment link is requested, and transactional email failures never
//! fail a checkout.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::catalog::{Product, PromoCode, Variant};
use crate::domain::error::Error;
use crate::domain::money::format_cents;
use crate::domain::ports::{
    CatalogQuery, MailSender, NewOrder, NewOrderLine, Order, OrderRepository, OutboundEmail,
    PaymentGateway, PaymentRequest, PromoCodeRepository,
};

/// One line of a checkout request, quantities only. Prices are looked up
/// fresh from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub quantity: u32,
}

/// A complete checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInput {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_address: String,
    pub note: Option<String>,
    pub lines: Vec<CheckoutLine>,
    pub promo_code: Option<String>,
}

/// What the storefront needs to send the customer onwards to payment.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub payment_url: String,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

/// Result of validating a promo code against a subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoQuote {
    pub code: String,
    pub discount_cents: i64,
    pub total_cents: i64,
}

pub struct CheckoutService {
    catalog: Arc<dyn CatalogQuery>,
    promo_codes: Arc<dyn PromoCodeRepository>,
    orders: Arc<dyn OrderRepository>,
    payments: Arc<dyn PaymentGateway>,
    mail: Arc<dyn MailSender>,
    /// Back-office address notified of new orders, when configured.
    admin_email: Option<String>,
}

impl CheckoutService {
    pub fn new(
        catalog: Arc<dyn CatalogQuery>,
        promo_codes: Arc<dyn PromoCodeRepository>,
        orders: Arc<dyn OrderRepository>,
        payments: Arc<dyn PaymentGateway>,
        mail: Arc<dyn MailSender>,
        admin_email: Option<String>,
    ) -> Self {
        Self {
            catalog,
            promo_codes,
            orders,
            payments,
            mail,
            admin_email,
        }
    }

    /// Validate a promo code against a subtotal without placing an order.
    pub async fn quote_promo(&self, code: &str, subtotal_cents: i64) -> Result<PromoQuote, Error> {
        let promo = self.lookup_promo(code).await?;
        let discount = promo
            .discount_for(subtotal_cents, Utc::now())
            .map_err(|rejection| Error::invalid_request(rejection.to_string()))?;
        Ok(PromoQuote {
            code: promo.code,
            discount_cents: discount,
            total_cents: subtotal_cents - discount,
        })
    }

    /// Place an order: re-price, apply the promo, persist, mint the payment
    /// link, then send the emails.
    pub async fn checkout(&self, input: &CheckoutInput) -> Result<CheckoutOutcome, Error> {
        validate_contact(input)?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            lines.push(self.price_line(line).await?);
        }
        let subtotal_cents: i64 = lines.iter().map(line_subtotal).sum();

        let (promo, discount_cents) = match &input.promo_code {
            Some(code) => {
                let promo = self.lookup_promo(code).await?;
                let discount = promo
                    .discount_for(subtotal_cents, Utc::now())
                    .map_err(|rejection| Error::invalid_request(rejection.to_string()))?;
                (Some(promo), discount)
            }
            None => (None, 0),
        };
        let total_cents = subtotal_cents - discount_cents;

        let new_order = NewOrder {
            customer_name: input.customer_name.trim().to_owned(),
            customer_email: input.customer_email.trim().to_owned(),
            customer_phone: input.customer_phone.clone(),
            shipping_address: input.shipping_address.trim().to_owned(),
            note: input.note.clone(),
            lines,
            subtotal_cents,
            discount_cents,
            total_cents,
            promo_code_id: promo.as_ref().map(|p| p.id),
        };
        let order = self
            .orders
            .create(&new_order)
            .await
            .map_err(|err| Error::service_unavailable(err.to_string()))?;

        let link = self
            .payments
            .create_payment_link(&PaymentRequest {
                order_id: order.id,
                order_reference: order.reference.clone(),
                amount_cents: total_cents,
                customer_email: order.customer_email.clone(),
                description: format!("Order {}", order.reference),
            })
            .await
            .map_err(|err| {
                tracing::error!(order = %order.reference, error = %err, "payment link failed");
                Error::service_unavailable("payment provider is unavailable")
            })?;

        if let Err(err) = self
            .orders
            .set_payment_reference(order.id, &link.reference)
            .await
        {
            // The link is already minted; losing the reference is recoverable
            // from the provider's dashboard.
            tracing::warn!(order = %order.reference, error = %err, "payment reference not stored");
        }

        if let Some(promo) = &promo {
            if let Err(err) = self.promo_codes.record_redemption(promo.id).await {
                tracing::warn!(code = %promo.code, error = %err, "redemption not recorded");
            }
        }

        self.send_emails(&order).await;

        Ok(CheckoutOutcome {
            order,
            payment_url: link.url,
            subtotal_cents,
            discount_cents,
            total_cents,
        })
    }

    async fn lookup_promo(&self, code: &str) -> Result<PromoCode, Error> {
        self.promo_codes
            .find_by_code(code.trim())
            .await
            .map_err(|err| Error::service_unavailable(err.to_string()))?
            .ok_or_else(|| Error::invalid_request("unknown promo code"))
    }

    /// Re-price one requested line from the catalog, checking stock.
    async fn price_line(&self, line: &CheckoutLine) -> Result<NewOrderLine, Error> {
        if line.quantity == 0 {
            return Err(Error::invalid_request("line quantity must be positive"));
        }
        let product = self
            .catalog
            .find_by_id(line.product_id)
            .await
            .map_err(|err| Error::service_unavailable(err.to_string()))?
            .filter(|product| product.is_active)
            .ok_or_else(|| Error::not_found("product is no longer available"))?;

        match line.variant_id {
            Some(variant_id) => {
                let variant = self
                    .catalog
                    .find_variant(variant_id)
                    .await
                    .map_err(|err| Error::service_unavailable(err.to_string()))?
                    .filter(|variant| variant.is_active && variant.product_id == product.id)
                    .ok_or_else(|| Error::not_found("variant is no longer available"))?;
                check_stock(&product.name, variant.stock_quantity, line.quantity)?;
                Ok(order_line(&product, Some(&variant), line.quantity))
            }
            None => {
                if product.has_variants {
                    return Err(Error::invalid_request(format!(
                        "'{}' requires a size selection",
                        product.name
                    )));
                }
                check_stock(&product.name, product.stock_quantity, line.quantity)?;
                Ok(order_line(&product, None, line.quantity))
            }
        }
    }

    async fn send_emails(&self, order: &Order) {
        let confirmation = OutboundEmail {
            to: order.customer_email.clone(),
            subject: format!("Order {} received", order.reference),
            html_body: format!(
                "<p>Thank you, {}.</p><p>Order {} totalling {} is awaiting payment.</p>",
                order.customer_name,
                order.reference,
                format_cents(order.total_cents)
            ),
        };
        if let Err(err) = self.mail.send(&confirmation).await {
            tracing::warn!(order = %order.reference, error = %err, "confirmation email failed");
        }

        if let Some(admin) = &self.admin_email {
            let notification = OutboundEmail {
                to: admin.clone(),
                subject: format!("New order {}", order.reference),
                html_body: format!(
                    "<p>{} placed order {} totalling {}.</p>",
                    order.customer_name,
                    order.reference,
                    format_cents(order.total_cents)
                ),
            };
            if let Err(err) = self.mail.send(&notification).await {
                tracing::warn!(order = %order.reference, error = %err, "admin notification failed");
            }
        }
    }
}

fn validate_contact(input: &CheckoutInput) -> Result<(), Error> {
    if input.lines.is_empty() {
        return Err(Error::invalid_request("cart is empty"));
    }
    if input.customer_name.trim().is_empty() {
        return Err(Error::invalid_request("customer name is required"));
    }
    let email = input.customer_email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::invalid_request("a valid email address is required"));
    }
    if input.shipping_address.trim().is_empty() {
        return Err(Error::invalid_request("shipping address is required"));
    }
    Ok(())
}

fn check_stock(name: &str, available: i32, requested: u32) -> Result<(), Error> {
    let requested = i64::from(requested);
    if i64::from(available) < requested {
        return Err(Error::conflict(format!("insufficient stock for '{name}'")));
    }
    Ok(())
}

fn order_line(product: &Product, variant: Option<&Variant>, quantity: u32) -> NewOrderLine {
    NewOrderLine {
        product_id: product.id,
        variant_id: variant.map(|v| v.id),
        product_name: product.name.clone(),
        size_label: variant.map(|v| v.size_label.clone()),
        quantity,
        unit_price_cents: variant.map_or(product.price_cents, |v| v.price_cents),
    }
}

fn line_subtotal(line: &NewOrderLine) -> i64 {
    line.unit_price_cents * i64::from(line.quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::domain::catalog::{DiscountType, ProductKind};
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::{
        MailSenderError, MockCatalogQuery, MockMailSender, MockOrderRepository,
        MockPaymentGateway, MockPromoCodeRepository, OrderStatus, PaymentLink,
    };

    fn product(id: Uuid, price: i64, stock: i32, has_variants: bool) -> Product {
        Product {
            id,
            slug: "rug".into(),
            name: "Rug".into(),
            description: String::new(),
            kind: ProductKind::Carpet,
            material: None,
            price_cents: price,
            compare_at_price_cents: None,
            stock_quantity: stock,
            is_featured: false,
            is_active: true,
            has_variants,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn variant(id: Uuid, product_id: Uuid, price: i64, stock: i32) -> Variant {
        Variant {
            id,
            product_id,
            sku: "FL-RUG-0".into(),
            size_label: "160×230".into(),
            price_cents: price,
            compare_at_price_cents: None,
            stock_quantity: stock,
            color_id: None,
            is_active: true,
            sort_order: 0,
        }
    }

    fn promo(code: &str, percent: i64) -> PromoCode {
        PromoCode {
            id: Uuid::new_v4(),
            code: code.into(),
            discount_type: DiscountType::Percentage,
            discount_value: percent,
            min_purchase_cents: None,
            max_uses: None,
            per_customer_cap: None,
            times_used: 0,
            is_active: true,
            expires_at: None,
        }
    }

    fn order_row(total: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            reference: "FL-1001".into(),
            customer_name: "Ada".into(),
            customer_email: "ada@example.com".into(),
            total_cents: total,
            status: OrderStatus::PendingPayment,
            created_at: Utc::now(),
        }
    }

    fn input(lines: Vec<CheckoutLine>, promo_code: Option<&str>) -> CheckoutInput {
        CheckoutInput {
            customer_name: "Ada".into(),
            customer_email: "ada@example.com".into(),
            customer_phone: None,
            shipping_address: "1 Loom Lane".into(),
            note: None,
            lines,
            promo_code: promo_code.map(str::to_owned),
        }
    }

    struct Mocks {
        catalog: MockCatalogQuery,
        promo_codes: MockPromoCodeRepository,
        orders: MockOrderRepository,
        payments: MockPaymentGateway,
        mail: MockMailSender,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                catalog: MockCatalogQuery::new(),
                promo_codes: MockPromoCodeRepository::new(),
                orders: MockOrderRepository::new(),
                payments: MockPaymentGateway::new(),
                mail: MockMailSender::new(),
            }
        }

        fn into_service(self, admin_email: Option<&str>) -> CheckoutService {
            CheckoutService::new(
                Arc::new(self.catalog),
                Arc::new(self.promo_codes),
                Arc::new(self.orders),
                Arc::new(self.payments),
                Arc::new(self.mail),
                admin_email.map(str::to_owned),
            )
        }
    }

    fn stub_payment(mocks: &mut Mocks) {
        mocks.payments.expect_create_payment_link().returning(|req| {
            Ok(PaymentLink {
                reference: format!("pay-{}", req.order_id),
                url: "https://pay.example.com/abc".into(),
            })
        });
    }

    #[tokio::test]
    async fn checkout_reprices_from_the_catalog_and_applies_the_promo() {
        let product_id = Uuid::new_v4();
        let variant_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        let p = product(product_id, 999, 0, true);
        mocks
            .catalog
            .expect_find_by_id()
            .with(eq(product_id))
            .returning(move |_| Ok(Some(p.clone())));
        let v = variant(variant_id, product_id, 150_000, 10);
        mocks
            .catalog
            .expect_find_variant()
            .with(eq(variant_id))
            .returning(move |_| Ok(Some(v.clone())));

        let code = promo("SPRING10", 10);
        let code_id = code.id;
        mocks
            .promo_codes
            .expect_find_by_code()
            .withf(|code| code == "SPRING10")
            .returning(move |_| Ok(Some(code.clone())));
        mocks
            .promo_codes
            .expect_record_redemption()
            .with(eq(code_id))
            .times(1)
            .returning(|_| Ok(()));

        let captured = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&captured);
        mocks.orders.expect_create().returning(move |new_order| {
            *sink.lock().unwrap() = Some(new_order.clone());
            Ok(order_row(new_order.total_cents))
        });
        mocks
            .orders
            .expect_set_payment_reference()
            .times(1)
            .returning(|_, _| Ok(()));
        stub_payment(&mut mocks);
        mocks.mail.expect_send().times(2).returning(|_| Ok(()));

        let service = mocks.into_service(Some("shop@example.com"));
        let request = input(
            vec![CheckoutLine {
                product_id,
                variant_id: Some(variant_id),
                quantity: 2,
            }],
            Some("SPRING10"),
        );
        let outcome = service.checkout(&request).await.expect("checkout");

        // Two variants at 1500.00 with 10% off.
        assert_eq!(outcome.subtotal_cents, 300_000);
        assert_eq!(outcome.discount_cents, 30_000);
        assert_eq!(outcome.total_cents, 270_000);
        assert_eq!(outcome.payment_url, "https://pay.example.com/abc");

        let new_order = captured.lock().unwrap().clone().expect("order persisted");
        assert_eq!(new_order.lines.len(), 1);
        assert_eq!(new_order.lines[0].unit_price_cents, 150_000);
        assert_eq!(new_order.lines[0].size_label.as_deref(), Some("160×230"));
        assert_eq!(new_order.promo_code_id, Some(code_id));
    }

    #[tokio::test]
    async fn insufficient_stock_is_a_conflict() {
        let product_id = Uuid::new_v4();
        let mut mocks = Mocks::new();
        let p = product(product_id, 5_000, 1, false);
        mocks
            .catalog
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));

        let service = mocks.into_service(None);
        let request = input(
            vec![CheckoutLine {
                product_id,
                variant_id: None,
                quantity: 3,
            }],
            None,
        );
        let err = service.checkout(&request).await.expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn inactive_product_reads_as_missing() {
        let product_id = Uuid::new_v4();
        let mut mocks = Mocks::new();
        let mut p = product(product_id, 5_000, 5, false);
        p.is_active = false;
        mocks
            .catalog
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));

        let service = mocks.into_service(None);
        let request = input(
            vec![CheckoutLine {
                product_id,
                variant_id: None,
                quantity: 1,
            }],
            None,
        );
        let err = service.checkout(&request).await.expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn variant_product_requires_a_variant_selection() {
        let product_id = Uuid::new_v4();
        let mut mocks = Mocks::new();
        let p = product(product_id, 5_000, 0, true);
        mocks
            .catalog
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));

        let service = mocks.into_service(None);
        let request = input(
            vec![CheckoutLine {
                product_id,
                variant_id: None,
                quantity: 1,
            }],
            None,
        );
        let err = service.checkout(&request).await.expect_err("needs size");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn email_failure_does_not_fail_the_checkout() {
        let product_id = Uuid::new_v4();
        let mut mocks = Mocks::new();
        let p = product(product_id, 5_000, 5, false);
        mocks
            .catalog
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        mocks
            .orders
            .expect_create()
            .returning(|new_order| Ok(order_row(new_order.total_cents)));
        mocks
            .orders
            .expect_set_payment_reference()
            .returning(|_, _| Ok(()));
        stub_payment(&mut mocks);
        mocks
            .mail
            .expect_send()
            .returning(|_| Err(MailSenderError::unavailable("smtp down")));

        let service = mocks.into_service(None);
        let request = input(
            vec![CheckoutLine {
                product_id,
                variant_id: None,
                quantity: 1,
            }],
            None,
        );
        assert!(service.checkout(&request).await.is_ok());
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let service = Mocks::new().into_service(None);
        let err = service
            .checkout(&input(Vec::new(), None))
            .await
            .expect_err("empty");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn unknown_promo_code_is_an_invalid_request() {
        let mut mocks = Mocks::new();
        mocks
            .promo_codes
            .expect_find_by_code()
            .returning(|_| Ok(None));
        let service = mocks.into_service(None);
        let err = service.quote_promo("NOPE", 10_000).await.expect_err("bad");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn quote_promo_reports_the_discount() {
        let mut mocks = Mocks::new();
        let code = promo("SPRING10", 10);
        mocks
            .promo_codes
            .expect_find_by_code()
            .returning(move |_| Ok(Some(code.clone())));
        let service = mocks.into_service(None);
        let quote = service.quote_promo("SPRING10", 10_000).await.expect("ok");
        assert_eq!(quote.discount_cents, 1_000);
        assert_eq!(quote.total_cents, 9_000);
    }
}
