//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. The nine
//! attribute reference tables share one column layout, as do their nine
//! product junction tables; every junction names its attribute column
//! `attribute_id` so adapters can treat them uniformly.

diesel::table! {
    /// Catalog products, both carpets and plants.
    products (id) {
        id -> Uuid,
        slug -> Varchar,
        name -> Varchar,
        description -> Text,
        /// Product family token: `carpet` or `plant`.
        kind -> Varchar,
        material -> Nullable<Varchar>,
        price_cents -> Int8,
        compare_at_price_cents -> Nullable<Int8>,
        stock_quantity -> Int4,
        is_featured -> Bool,
        is_active -> Bool,
        has_variants -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Size/price/stock variants, each belonging to one product.
    product_variants (id) {
        id -> Uuid,
        product_id -> Uuid,
        sku -> Varchar,
        size_label -> Varchar,
        price_cents -> Int8,
        compare_at_price_cents -> Nullable<Int8>,
        stock_quantity -> Int4,
        color_id -> Nullable<Uuid>,
        is_active -> Bool,
        sort_order -> Int4,
    }
}

diesel::table! {
    /// Product photos ordered by sort order.
    product_images (id) {
        id -> Uuid,
        product_id -> Uuid,
        url -> Text,
        sort_order -> Int4,
    }
}

macro_rules! attribute_table {
    ($(#[$doc:meta])* $name:ident) => {
        diesel::table! {
            $(#[$doc])*
            $name (id) {
                id -> Uuid,
                slug -> Varchar,
                name -> Varchar,
                is_active -> Bool,
                sort_order -> Int4,
            }
        }
    };
}

attribute_table!(
    /// Carpet categories.
    categories
);
attribute_table!(
    /// Colors; shared by carpet looks and variant colors.
    colors
);
attribute_table!(
    /// Carpet shapes.
    shapes
);
attribute_table!(
    /// Rooms and spaces a carpet suits.
    spaces
);
attribute_table!(
    /// Plant species groupings.
    plant_types
);
attribute_table!(
    /// Plant pot/height sizes.
    plant_sizes
);
attribute_table!(
    /// Plant light requirements.
    plant_light_levels
);
attribute_table!(
    /// Plant care difficulty levels.
    plant_care_levels
);
attribute_table!(
    /// Plant pet-safety ratings.
    plant_pet_safety
);

macro_rules! junction_table {
    ($(#[$doc:meta])* $name:ident) => {
        diesel::table! {
            $(#[$doc])*
            $name (product_id, attribute_id) {
                product_id -> Uuid,
                attribute_id -> Uuid,
            }
        }
    };
}

junction_table!(
    /// Product to category associations.
    product_categories
);
junction_table!(
    /// Product to color associations.
    product_colors
);
junction_table!(
    /// Product to shape associations.
    product_shapes
);
junction_table!(
    /// Product to space associations.
    product_spaces
);
junction_table!(
    /// Product to plant type associations.
    product_plant_types
);
junction_table!(
    /// Product to plant size associations.
    product_plant_sizes
);
junction_table!(
    /// Product to light level associations.
    product_plant_light_levels
);
junction_table!(
    /// Product to care level associations.
    product_plant_care_levels
);
junction_table!(
    /// Product to pet-safety associations.
    product_plant_pet_safety
);

diesel::table! {
    /// Promo codes with usage accounting.
    promo_codes (id) {
        id -> Uuid,
        /// Stored uppercase; lookups are case-insensitive.
        code -> Varchar,
        /// Discount type token: `percentage` or `fixed`.
        discount_type -> Varchar,
        discount_value -> Int8,
        min_purchase_cents -> Nullable<Int8>,
        max_uses -> Nullable<Int4>,
        per_customer_cap -> Nullable<Int4>,
        times_used -> Int4,
        is_active -> Bool,
        expires_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Order headers with contact snapshot and totals.
    orders (id) {
        id -> Uuid,
        reference -> Varchar,
        customer_name -> Varchar,
        customer_email -> Varchar,
        customer_phone -> Nullable<Varchar>,
        shipping_address -> Text,
        note -> Nullable<Text>,
        subtotal_cents -> Int8,
        discount_cents -> Int8,
        total_cents -> Int8,
        promo_code_id -> Nullable<Uuid>,
        /// Lifecycle token: `pending_payment`, `paid`, or `cancelled`.
        status -> Varchar,
        payment_reference -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Priced order lines snapshotted at checkout.
    order_items (id) {
        id -> Uuid,
        order_id -> Uuid,
        product_id -> Uuid,
        variant_id -> Nullable<Uuid>,
        product_name -> Varchar,
        size_label -> Nullable<Varchar>,
        quantity -> Int4,
        unit_price_cents -> Int8,
    }
}

diesel::table! {
    /// Curated storefront gallery images.
    gallery_images (id) {
        id -> Uuid,
        url -> Text,
        caption -> Nullable<Text>,
        sort_order -> Int4,
        is_active -> Bool,
    }
}

diesel::table! {
    /// Landing-page banners; at most one row is kept.
    banners (id) {
        id -> Uuid,
        headline -> Varchar,
        subtext -> Nullable<Text>,
        image_url -> Nullable<Text>,
        link_url -> Nullable<Text>,
        is_active -> Bool,
    }
}

diesel::joinable!(product_variants -> products (product_id));
diesel::joinable!(product_images -> products (product_id));
diesel::joinable!(order_items -> orders (order_id));
diesel::joinable!(orders -> promo_codes (promo_code_id));

diesel::joinable!(product_categories -> products (product_id));
diesel::joinable!(product_categories -> categories (attribute_id));
diesel::joinable!(product_colors -> products (product_id));
diesel::joinable!(product_colors -> colors (attribute_id));
diesel::joinable!(product_shapes -> products (product_id));
diesel::joinable!(product_shapes -> shapes (attribute_id));
diesel::joinable!(product_spaces -> products (product_id));
diesel::joinable!(product_spaces -> spaces (attribute_id));
diesel::joinable!(product_plant_types -> products (product_id));
diesel::joinable!(product_plant_types -> plant_types (attribute_id));
diesel::joinable!(product_plant_sizes -> products (product_id));
diesel::joinable!(product_plant_sizes -> plant_sizes (attribute_id));
diesel::joinable!(product_plant_light_levels -> products (product_id));
diesel::joinable!(product_plant_light_levels -> plant_light_levels (attribute_id));
diesel::joinable!(product_plant_care_levels -> products (product_id));
diesel::joinable!(product_plant_care_levels -> plant_care_levels (attribute_id));
diesel::joinable!(product_plant_pet_safety -> products (product_id));
diesel::joinable!(product_plant_pet_safety -> plant_pet_safety (attribute_id));

diesel::allow_tables_to_appear_in_same_query!(
    products,
    product_variants,
    product_images,
    categories,
    colors,
    shapes,
    spaces,
    plant_types,
    plant_sizes,
    plant_light_levels,
    plant_care_levels,
    plant_pet_safety,
    product_categories,
    product_colors,
    product_shapes,
    product_spaces,
    product_plant_types,
    product_plant_sizes,
    product_plant_light_levels,
    product_plant_care_levels,
    product_plant_pet_safety,
    promo_codes,
    orders,
    order_items,
    gallery_images,
    banners,
);
