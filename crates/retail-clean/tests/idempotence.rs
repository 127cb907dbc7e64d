//! Property tests: every column rule is idempotent and keeps the row count.

use polars::prelude::*;
use proptest::prelude::*;

use retail_clean::rules::{
    clean_card_numbers, clean_country_code, clean_dates, clean_lat_long, clean_phone_numbers,
    clean_uuids, coerce_integer, convert_weights, enforce_card_number_length, filter_categories,
    integer_strings, parse_date_column, parse_time_column,
};
use retail_clean::structure::replace_value;
use retail_model::categories::{CARD_PROVIDERS, STORE_TYPES};

fn frame(name: &str, values: &[Option<String>]) -> DataFrame {
    DataFrame::new(vec![Series::new(name.into(), values.to_vec()).into_column()]).unwrap()
}

fn paired_frame(
    first: (&str, &[Option<String>]),
    second: (&str, &[Option<String>]),
) -> DataFrame {
    DataFrame::new(vec![
        Series::new(first.0.into(), first.1.to_vec()).into_column(),
        Series::new(second.0.into(), second.1.to_vec()).into_column(),
    ])
    .unwrap()
}

fn assert_idempotent<F>(name: &str, values: &[Option<String>], rule: F) -> Result<(), TestCaseError>
where
    F: Fn(&mut DataFrame) -> retail_clean::Result<usize>,
{
    assert_frame_idempotent(frame(name, values), rule)
}

fn assert_frame_idempotent<F>(df: DataFrame, rule: F) -> Result<(), TestCaseError>
where
    F: Fn(&mut DataFrame) -> retail_clean::Result<usize>,
{
    let rows = df.height();
    let mut once = df;
    rule(&mut once).unwrap();
    let mut twice = once.clone();
    rule(&mut twice).unwrap();

    prop_assert_eq!(once.height(), rows);
    prop_assert!(once.equals_missing(&twice), "{once:?} != {twice:?}");
    Ok(())
}

fn cells(pattern: &'static str) -> impl Strategy<Value = Vec<Option<String>>> {
    proptest::collection::vec(proptest::option::of(pattern), 1..20)
}

fn one_of(choices: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    proptest::option::of(proptest::sample::select(choices).prop_map(str::to_string))
}

fn phones_with_countries() -> impl Strategy<Value = (Vec<Option<String>>, Vec<Option<String>>)> {
    let phone = "(\\+44 ?[0-9]{4} ?[0-9]{6}|\\+49 ?[0-9]{3} ?[0-9]{6,8}|\\(?[0-9]{3}\\)?-?[0-9]{3}-?[0-9]{4}|0[0-9]{9,10}|.{0,12})";
    (1usize..20).prop_flat_map(move |rows| {
        (
            proptest::collection::vec(proptest::option::of(phone), rows),
            proptest::collection::vec(one_of(&["GB", "DE", "US", "FR"]), rows),
        )
    })
}

fn cards_with_providers() -> impl Strategy<Value = (Vec<Option<String>>, Vec<Option<String>>)> {
    (1usize..20).prop_flat_map(|rows| {
        (
            proptest::collection::vec(proptest::option::of("[0-9]{11,20}"), rows),
            proptest::collection::vec(one_of(CARD_PROVIDERS.values), rows),
        )
    })
}

fn weights() -> impl Strategy<Value = Vec<Option<String>>> {
    cells("([0-9]{1,2} x )?[0-9]{1,4}(\\.[0-9]{1,2})?(kg|g|oz|ml|)")
}

proptest! {
    #[test]
    fn country_code_is_idempotent(values in cells(".{0,6}")) {
        assert_idempotent("country_code", &values, |df| clean_country_code(df, "country_code"))?;
    }

    #[test]
    fn country_code_leaves_short_values(values in cells("[A-Z]{0,5}")) {
        let mut df = frame("country_code", &values);
        clean_country_code(&mut df, "country_code").unwrap();
        let col = df.column("country_code").unwrap().str().unwrap();
        for value in col.into_iter().flatten() {
            prop_assert!(value.chars().count() <= 2);
        }
    }

    #[test]
    fn dates_are_idempotent(
        values in cells("([0-9]{4}-[0-9]{2}-[0-9]{2}|[0-9]{2}/[0-9]{2}/[0-9]{4}|.{0,10})")
    ) {
        let columns = vec!["join_date".to_string()];
        assert_idempotent("join_date", &values, |df| clean_dates(df, &columns))?;
    }

    #[test]
    fn uuids_are_idempotent(values in cells("([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}|.{0,12})")) {
        let columns = vec!["user_uuid".to_string()];
        assert_idempotent("user_uuid", &values, |df| clean_uuids(df, &columns))?;
    }

    #[test]
    fn card_numbers_are_idempotent(values in cells("[0-9?A-Z]{0,19}")) {
        assert_idempotent("card_number", &values, |df| clean_card_numbers(df, "card_number"))?;
    }

    #[test]
    fn lat_long_is_idempotent(values in cells("(-?[0-9]{1,3}\\.[0-9]{0,8}|N/A|.{0,6})")) {
        let columns = vec!["longitude".to_string()];
        assert_idempotent("longitude", &values, |df| clean_lat_long(df, &columns))?;
    }

    #[test]
    fn weights_are_idempotent(values in weights()) {
        assert_idempotent("weight", &values, |df| convert_weights(df, "weight"))?;
    }

    #[test]
    fn integer_strings_are_idempotent(values in cells("([0-9]{1,4}(\\.0)?|[0-9]{1,2}\\.5|.{0,4})")) {
        let columns = vec!["year".to_string()];
        assert_idempotent("year", &values, |df| integer_strings(df, &columns))?;
    }

    #[test]
    fn categories_are_idempotent(values in cells("(Local|Outlet|Mall Kiosk|local|.{0,6})")) {
        let allowed = STORE_TYPES.to_vec();
        assert_idempotent("store_type", &values, |df| filter_categories(df, "store_type", &allowed))?;
    }

    #[test]
    fn phone_numbers_are_idempotent((phones, countries) in phones_with_countries()) {
        let df = paired_frame(("phone_number", &phones), ("country_code", &countries));
        assert_frame_idempotent(df, |df| clean_phone_numbers(df, "phone_number", "country_code"))?;
    }

    #[test]
    fn integer_coercion_is_idempotent(
        values in cells("(-?[0-9]{1,6}(\\.[0-9]{1,2})?|.{0,4})"),
        fallback in proptest::option::of(-5i64..5),
        truncate in any::<bool>()
    ) {
        assert_idempotent("staff_numbers", &values, |df| {
            coerce_integer(df, "staff_numbers", fallback, truncate)
        })?;
    }

    #[test]
    fn payment_dates_are_idempotent(
        values in cells("([0-9]{4}-[0-9]{2}-[0-9]{2}|[0-9]{4} (January|October) [0-9]{2}|.{0,10})")
    ) {
        assert_idempotent("date_payment_confirmed", &values, |df| {
            parse_date_column(df, "date_payment_confirmed")
        })?;
    }

    #[test]
    fn times_are_idempotent(values in cells("([0-9]{2}:[0-9]{2}:[0-9]{2}|.{0,8})")) {
        assert_idempotent("timestamp", &values, |df| parse_time_column(df, "timestamp"))?;
    }

    #[test]
    fn card_number_length_is_idempotent((numbers, providers) in cards_with_providers()) {
        let df = paired_frame(("card_number", &numbers), ("card_provider", &providers));
        assert_frame_idempotent(df, |df| {
            enforce_card_number_length(df, "card_number", "card_provider")
        })?;
    }

    #[test]
    fn replace_value_is_idempotent(values in cells("(eeEurope|Europe|eeAmerica|.{0,8})")) {
        assert_idempotent("continent", &values, |df| {
            replace_value(df, "continent", "eeEurope", "Europe")
        })?;
    }
}
