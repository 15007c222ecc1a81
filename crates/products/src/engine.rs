//! Filter/sort engine.
//!
//! `derive_view` is a pure function of its inputs: same snapshot + same
//! criteria = same ordered output. Filters are independent predicates; the
//! sort always runs last and is stable, so ties keep snapshot order.

use catalog_core::Product;

use crate::collation::compare_names;
use crate::criteria::{FilterCriteria, SortKey};

/// Derives the ordered products to render for `criteria`.
pub fn derive_view(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    derive_view_refs(products, criteria)
        .into_iter()
        .cloned()
        .collect()
}

/// Borrowing variant of [`derive_view`]; avoids cloning the snapshot.
pub fn derive_view_refs<'a>(
    products: &'a [Product],
    criteria: &FilterCriteria,
) -> Vec<&'a Product> {
    let query = criteria.normalized_query();

    let mut view: Vec<&Product> = products
        .iter()
        .filter(|p| p.is_active)
        .filter(|p| query.as_deref().is_none_or(|q| matches_query(p, q)))
        .filter(|p| criteria.category.matches(p))
        .filter(|p| criteria.gender.matches(p))
        .filter(|p| p.base_price <= criteria.max_price)
        .filter(|p| !criteria.featured_only || p.is_featured)
        .collect();

    sort_products(&mut view, criteria.sort);
    view
}

/// Case-insensitive substring match; `needle` must already be lowercased.
fn matches_query(product: &Product, needle: &str) -> bool {
    [&product.name, &product.description, &product.slug]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn sort_products(view: &mut [&Product], sort: SortKey) {
    match sort {
        // `None < Some`, so undated products land at the end.
        SortKey::Newest => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::PriceAsc => view.sort_by(|a, b| a.base_price.total_cmp(&b.base_price)),
        SortKey::PriceDesc => view.sort_by(|a, b| b.base_price.total_cmp(&a.base_price)),
        SortKey::Name => view.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
}

/// Distinct category names of active products, in display order.
pub fn available_categories(products: &[Product]) -> Vec<String> {
    let mut names: Vec<String> = products
        .iter()
        .filter(|p| p.is_active && !p.category_name.is_empty())
        .map(|p| p.category_name.clone())
        .collect();
    names.sort_by(|a, b| compare_names(a, b));
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{CategoryFilter, GenderFilter};
    use catalog_core::Gender;
    use chrono::{TimeZone, Utc};

    fn product(id: &str, name: &str, price: f64) -> Product {
        Product::new(id.parse().unwrap(), name, price)
    }

    fn names(view: &[Product]) -> Vec<&str> {
        view.iter().map(|p| p.name.as_str()).collect()
    }

    fn seed() -> Vec<Product> {
        let mut tuna = product("1", "Sleek Metal Tuna", 41.77);
        tuna.slug = "sleek-metal-tuna".into();
        tuna.category_name = "Pajamas".into();
        tuna.gender = Gender::Male;
        tuna.created_at = Some(Utc.with_ymd_and_hms(2024, 10, 13, 19, 49, 20).unwrap());

        let mut chair = product("2", "Awesome Cotton Chair", 96.05);
        chair.description = "Ergonomic executive chair".into();
        chair.category_name = "Lingerie".into();
        chair.created_at = Some(Utc.with_ymd_and_hms(2024, 9, 5, 17, 53, 9).unwrap());

        let mut car = product("3", "Tasty Concrete Car", 89.39);
        car.category_name = "Pajamas".into();
        car.gender = Gender::Female;
        car.is_featured = true;
        car.created_at = Some(Utc.with_ymd_and_hms(2025, 2, 16, 7, 16, 41).unwrap());

        vec![tuna, chair, car]
    }

    #[test]
    fn empty_snapshot_yields_empty_view() {
        assert!(derive_view(&[], &FilterCriteria::default()).is_empty());
    }

    #[test]
    fn inactive_products_never_render() {
        let mut products = seed();
        products[2].is_active = false;
        let view = derive_view(&products, &FilterCriteria::default());
        assert!(view.iter().all(|p| p.is_active));
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn price_ceiling_is_inclusive() {
        let products = seed();
        let view = derive_view(&products, &FilterCriteria::default().with_max_price(50.0));
        assert_eq!(names(&view), vec!["Sleek Metal Tuna"]);

        let view = derive_view(&products, &FilterCriteria::default().with_max_price(41.77));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn ceiling_below_every_price_is_an_empty_view_not_an_error() {
        let view = derive_view(&seed(), &FilterCriteria::default().with_max_price(1.0));
        assert!(view.is_empty());
    }

    #[test]
    fn empty_query_keeps_all_ten() {
        let products: Vec<Product> = (0..10)
            .map(|i| product(&i.to_string(), &format!("Item {i}"), 10.0))
            .collect();
        let view = derive_view(&products, &FilterCriteria::default().with_query(""));
        assert_eq!(view.len(), 10);
    }

    #[test]
    fn query_matches_name_description_or_slug_ignoring_case() {
        let products = seed();

        let by_name = derive_view(&products, &FilterCriteria::default().with_query("TUNA"));
        assert_eq!(names(&by_name), vec!["Sleek Metal Tuna"]);

        let by_description =
            derive_view(&products, &FilterCriteria::default().with_query("executive"));
        assert_eq!(names(&by_description), vec!["Awesome Cotton Chair"]);

        let by_slug = derive_view(&products, &FilterCriteria::default().with_query("metal-tuna"));
        assert_eq!(names(&by_slug), vec!["Sleek Metal Tuna"]);

        let none = derive_view(&products, &FilterCriteria::default().with_query("zebra"));
        assert!(none.is_empty());
    }

    #[test]
    fn surrounding_spaces_are_part_of_the_query() {
        let products = vec![
            product("1", "Silk Robe", 95.3),
            product("2", "Robe Long", 80.0),
        ];

        let trailing = derive_view(&products, &FilterCriteria::default().with_query("Robe "));
        assert_eq!(names(&trailing), vec!["Robe Long"]);

        let leading = derive_view(&products, &FilterCriteria::default().with_query(" robe"));
        assert_eq!(names(&leading), vec!["Silk Robe"]);
    }

    #[test]
    fn category_match_is_exact() {
        let products = seed();
        let criteria = FilterCriteria::default()
            .with_category(CategoryFilter::Named("Pajamas".into()))
            .with_sort(SortKey::Name);
        assert_eq!(
            names(&derive_view(&products, &criteria)),
            vec!["Sleek Metal Tuna", "Tasty Concrete Car"]
        );

        let criteria =
            FilterCriteria::default().with_category(CategoryFilter::Named("pajamas".into()));
        assert!(derive_view(&products, &criteria).is_empty());
    }

    #[test]
    fn gender_filter_really_filters() {
        let criteria = FilterCriteria::default().with_gender(GenderFilter::Only(Gender::Female));
        assert_eq!(names(&derive_view(&seed(), &criteria)), vec!["Tasty Concrete Car"]);

        let criteria = FilterCriteria::default().with_gender(GenderFilter::Only(Gender::Unisex));
        assert_eq!(names(&derive_view(&seed(), &criteria)), vec!["Awesome Cotton Chair"]);
    }

    #[test]
    fn featured_only_keeps_featured() {
        let criteria = FilterCriteria::default().with_featured_only(true);
        assert_eq!(names(&derive_view(&seed(), &criteria)), vec!["Tasty Concrete Car"]);
    }

    #[test]
    fn newest_first_with_undated_last() {
        let mut products = seed();
        let mut undated = product("4", "Undated Robe", 5.0);
        undated.created_at = None;
        products.insert(0, undated);

        let view = derive_view(&products, &FilterCriteria::default());
        assert_eq!(
            names(&view),
            vec![
                "Tasty Concrete Car",
                "Sleek Metal Tuna",
                "Awesome Cotton Chair",
                "Undated Robe"
            ]
        );
    }

    #[test]
    fn price_sorts_are_stable_on_ties() {
        let products = vec![
            product("a", "First", 20.0),
            product("b", "Second", 10.0),
            product("c", "Third", 20.0),
        ];

        let asc = derive_view(&products, &FilterCriteria::default().with_sort(SortKey::PriceAsc));
        assert_eq!(names(&asc), vec!["Second", "First", "Third"]);

        let desc = derive_view(&products, &FilterCriteria::default().with_sort(SortKey::PriceDesc));
        assert_eq!(names(&desc), vec!["First", "Third", "Second"]);
    }

    #[test]
    fn name_sort_is_locale_aware() {
        let products = vec![
            product("1", "Banana", 1.0),
            product("2", "apple", 1.0),
            product("3", "Cherry", 1.0),
        ];
        let view = derive_view(&products, &FilterCriteria::default().with_sort(SortKey::Name));
        assert_eq!(names(&view), vec!["apple", "Banana", "Cherry"]);
    }

    #[test]
    fn categories_are_distinct_sorted_and_active_only() {
        let mut products = seed();
        let mut hidden = product("9", "Hidden", 1.0);
        hidden.category_name = "Archive".into();
        hidden.is_active = false;
        products.push(hidden);

        assert_eq!(available_categories(&products), vec!["Lingerie", "Pajamas"]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_product() -> impl Strategy<Value = Product> {
            (
                "[a-z0-9]{1,8}",
                "[A-Za-z ]{1,12}",
                0.0f64..300.0,
                any::<bool>(),
                any::<bool>(),
                prop_oneof![Just("Pajamas"), Just("Lingerie"), Just("Robes")],
                0u64..3,
                proptest::option::of(0i64..2_000_000_000),
            )
                .prop_map(|(id, name, price, active, featured, category, gender, ts)| {
                    let mut p = Product::new(id.parse().unwrap(), name, price);
                    p.is_active = active;
                    p.is_featured = featured;
                    p.category_name = category.to_string();
                    p.gender = Gender::from_code(gender).unwrap();
                    p.created_at = ts.and_then(|s| Utc.timestamp_opt(s, 0).single());
                    p
                })
        }

        fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
            (
                "[a-z ]{0,3}",
                prop_oneof![
                    Just(CategoryFilter::All),
                    Just(CategoryFilter::Named("Pajamas".into())),
                    Just(CategoryFilter::Named("Robes".into())),
                ],
                prop_oneof![
                    Just(GenderFilter::All),
                    Just(GenderFilter::Only(Gender::Male)),
                    Just(GenderFilter::Only(Gender::Female)),
                ],
                0.0f64..300.0,
                any::<bool>(),
                prop_oneof![
                    Just(SortKey::Newest),
                    Just(SortKey::PriceAsc),
                    Just(SortKey::PriceDesc),
                    Just(SortKey::Name),
                ],
            )
                .prop_map(|(query, category, gender, max_price, featured_only, sort)| {
                    FilterCriteria {
                        query,
                        category,
                        gender,
                        max_price,
                        featured_only,
                        sort,
                    }
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: deriving a view from a derived view changes nothing.
            #[test]
            fn derive_view_is_idempotent(
                products in proptest::collection::vec(arb_product(), 0..30),
                criteria in arb_criteria(),
            ) {
                let once = derive_view(&products, &criteria);
                let twice = derive_view(&once, &criteria);
                prop_assert_eq!(once, twice);
            }

            /// Property: same inputs, same output.
            #[test]
            fn derive_view_is_deterministic(
                products in proptest::collection::vec(arb_product(), 0..30),
                criteria in arb_criteria(),
            ) {
                prop_assert_eq!(
                    derive_view(&products, &criteria),
                    derive_view(&products, &criteria)
                );
            }

            /// Property: every rendered product satisfies every active filter.
            #[test]
            fn view_respects_every_filter(
                products in proptest::collection::vec(arb_product(), 0..30),
                criteria in arb_criteria(),
            ) {
                for p in derive_view(&products, &criteria) {
                    prop_assert!(p.is_active);
                    prop_assert!(p.base_price <= criteria.max_price);
                    prop_assert!(criteria.category.matches(&p));
                    prop_assert!(criteria.gender.matches(&p));
                    prop_assert!(!criteria.featured_only || p.is_featured);
                }
            }

            /// Property: the view is a subset of the snapshot; nothing is invented.
            #[test]
            fn view_is_drawn_from_snapshot(
                products in proptest::collection::vec(arb_product(), 0..30),
                criteria in arb_criteria(),
            ) {
                let view = derive_view(&products, &criteria);
                prop_assert!(view.len() <= products.len());
                for p in &view {
                    prop_assert!(products.contains(p));
                }
            }
        }
    }
}
