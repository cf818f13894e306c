use whg_rs::aggregate::build;
use whg_rs::models::{AggregatedCountryTable, AggregatedYearTable, YearTable};
use whg_rs::{WhgError, storage};

const INDICATORS: [&str; 3] = ["GDP", "SOCIAL SUPPORT", "LIFE EXPECTANCY"];

fn year(y: i32, rows: &[(&str, [f64; 3])]) -> YearTable {
    let mut t = YearTable::new(y, INDICATORS.iter().map(|s| s.to_string()).collect());
    for (country, values) in rows {
        t.push(*country, values.to_vec());
    }
    t
}

// A averages 2.5, B 3.0, C 1.0 -> B, A, C
fn four_years() -> Vec<YearTable> {
    vec![
        year(2019, &[("A", [1.0, 0.5, 0.5]), ("B", [1.0, 1.0, 1.0]), ("C", [0.5, 0.25, 0.25])]),
        year(2020, &[("A", [1.0, 1.0, 1.0]), ("B", [1.0, 1.0, 1.0]), ("C", [0.5, 0.25, 0.25])]),
        year(2021, &[("A", [0.5, 0.5, 0.5]), ("B", [1.0, 1.0, 1.0]), ("C", [0.5, 0.25, 0.25])]),
        year(2022, &[("A", [1.5, 1.0, 1.0]), ("B", [1.0, 1.0, 1.0]), ("C", [0.5, 0.25, 0.25])]),
    ]
}

fn assert_year_ranks(t: &AggregatedYearTable) {
    let mut ranks: Vec<usize> = t.rows.iter().map(|r| r.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=t.len()).collect::<Vec<_>>());
    for w in t.rows.windows(2) {
        assert!(w[0].rank < w[1].rank);
        assert!(w[0].total >= w[1].total);
    }
}

fn assert_country_ranks(t: &AggregatedCountryTable) {
    let mut ranks: Vec<usize> = t.rows.iter().map(|r| r.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=t.len()).collect::<Vec<_>>());
    for w in t.rows.windows(2) {
        assert!(w[0].rank < w[1].rank);
        assert!(w[0].total >= w[1].total);
    }
}

#[test]
fn ranks_are_contiguous_and_follow_total() {
    let data = build(&four_years()).unwrap();
    assert_eq!(data.by_year.len(), 12);
    assert_eq!(data.by_country.len(), 3);
    assert_year_ranks(&data.by_year);
    assert_country_ranks(&data.by_country);
}

#[test]
fn equal_totals_keep_country_then_year_order() {
    let data = build(&four_years()).unwrap();
    let order: Vec<(&str, i32)> = data
        .by_year
        .rows
        .iter()
        .map(|r| (r.country.as_str(), r.year))
        .collect();
    assert_eq!(
        order,
        vec![
            ("A", 2022),
            ("A", 2020),
            ("B", 2019),
            ("B", 2020),
            ("B", 2021),
            ("B", 2022),
            ("A", 2019),
            ("A", 2021),
            ("C", 2019),
            ("C", 2020),
            ("C", 2021),
            ("C", 2022),
        ]
    );
}

#[test]
fn country_values_are_means_of_year_values() {
    let data = build(&four_years()).unwrap();
    for c in &data.by_country.rows {
        let years: Vec<_> = data.by_year.rows_for(&c.country).collect();
        assert_eq!(years.len(), 4);
        assert_eq!(c.years, vec![2019, 2020, 2021, 2022]);
        let n = years.len() as f64;
        for i in 0..INDICATORS.len() {
            let mean = years.iter().filter_map(|r| r.values[i]).sum::<f64>() / n;
            assert!((c.values[i].unwrap() - mean).abs() < 1e-12, "{} field {i}", c.country);
        }
        let mean_total = years.iter().map(|r| r.total).sum::<f64>() / n;
        assert!((c.total - mean_total).abs() < 1e-12);
    }
}

#[test]
fn end_to_end_three_countries_and_export() {
    let data = build(&four_years()).unwrap();
    let t = &data.by_country;
    assert_eq!(t.country_names(), vec!["B", "A", "C"]);
    assert_eq!(t.by_rank(1).unwrap().country, "B");
    assert_eq!(t.by_rank(1).unwrap().total, 3.0);
    assert_eq!(t.find("a").unwrap().total, 2.5);
    assert_eq!(t.find("c").unwrap().rank, 3);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("all_data.csv");
    storage::save_csv(t, &path).unwrap();
    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "B");
    assert_eq!(&rows[0][1], "1");
    assert_eq!(rows[0][2].parse::<f64>().unwrap(), 3.0);
    assert_eq!(&rows[1][0], "A");
    assert_eq!(rows[1][2].parse::<f64>().unwrap(), 2.5);
    assert_eq!(&rows[2][0], "C");
    assert_eq!(&rows[2][1], "3");
}

#[test]
fn build_is_deterministic() {
    let input = four_years();
    let first = build(&input).unwrap();
    for _ in 0..5 {
        let again = build(&input).unwrap();
        assert_eq!(again, first);
        let bits = |t: &AggregatedCountryTable| -> Vec<u64> {
            t.rows
                .iter()
                .flat_map(|r| r.values.iter().flatten().chain(std::iter::once(&r.total)))
                .map(|v| v.to_bits())
                .collect()
        };
        assert_eq!(bits(&again.by_country), bits(&first.by_country));
    }
}

#[test]
fn mismatched_indicators_are_a_schema_error() {
    let mut tables = four_years();
    tables[2] = YearTable::new(2021, vec!["GDP".into(), "GENEROSITY".into(), "LIFE EXPECTANCY".into()]);
    match build(&tables) {
        Err(WhgError::Schema { year, .. }) => assert_eq!(year, 2021),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn short_record_is_rejected() {
    let mut tables = four_years();
    tables[1].push("D", vec![1.0]);
    assert!(matches!(
        build(&tables),
        Err(WhgError::RecordWidth { expected: 3, found: 1, .. })
    ));
}

#[test]
fn no_rows_is_empty_input() {
    assert_eq!(build(&[]), Err(WhgError::EmptyInput));
    let empty = vec![year(2019, &[]), year(2020, &[])];
    assert_eq!(build(&empty), Err(WhgError::EmptyInput));
}

#[test]
fn column_order_may_differ_between_years() {
    let a = year(2019, &[("A", [1.0, 2.0, 3.0])]);
    let mut b = YearTable::new(
        2020,
        vec!["life expectancy".into(), "GDP".into(), "Social Support".into()],
    );
    b.push("A", vec![5.0, 3.0, 4.0]);
    let data = build(&[a, b]).unwrap();
    let row = data.by_country.find("A").unwrap();
    assert_eq!(row.values, vec![Some(2.0), Some(3.0), Some(4.0)]);
    assert_eq!(data.by_country.indicators, INDICATORS.map(String::from).to_vec());
}

#[test]
fn same_country_and_year_from_two_sources_is_averaged() {
    let a = year(2019, &[("Finland", [1.0, 1.0, 1.0]), ("Chad", [0.1, 0.1, 0.1])]);
    let b = year(2019, &[("FINLAND ", [3.0, 1.0, 2.0])]);
    let data = build(&[a, b]).unwrap();
    assert_eq!(data.by_year.len(), 2);
    let fin = data.by_country.find("finland").unwrap();
    assert_eq!(fin.country, "Finland");
    assert_eq!(fin.values, vec![Some(2.0), Some(1.0), Some(1.5)]);
    assert_eq!(fin.total, 4.5);
    assert_eq!(fin.rank, 1);
}

#[test]
fn country_ties_break_by_name() {
    let t = year(2019, &[("ZAMBIA", [1.0, 1.0, 1.0]), ("ALBANIA", [1.0, 1.0, 1.0])]);
    let data = build(&[t]).unwrap();
    assert_eq!(data.by_country.country_names(), vec!["ALBANIA", "ZAMBIA"]);
}

#[test]
fn countries_missing_from_some_years_average_what_they_have() {
    let a = year(2019, &[("A", [1.0, 1.0, 1.0]), ("B", [2.0, 2.0, 2.0])]);
    let b = year(2020, &[("A", [3.0, 3.0, 3.0])]);
    let data = build(&[a, b]).unwrap();

    assert_eq!(data.by_year.len(), 3);
    let a = data.by_country.find("A").unwrap();
    assert_eq!(a.years, vec![2019, 2020]);
    assert_eq!(a.values, vec![Some(2.0), Some(2.0), Some(2.0)]);
    assert_eq!(a.total, 6.0);
    let b = data.by_country.find("B").unwrap();
    assert_eq!(b.years, vec![2019]);
    assert_eq!(b.total, 6.0);
    // equal totals keep name order
    assert_eq!(data.by_country.country_names(), vec!["A", "B"]);
}

#[test]
fn missing_cells_are_skipped_not_zeroed() {
    let mut y19 = YearTable::new(2019, INDICATORS.iter().map(|s| s.to_string()).collect());
    y19.push("QATAR", [Some(1.0), None, Some(0.5)]);
    y19.push("CHAD", [0.5, 0.5, 0.5]);
    let mut y20 = YearTable::new(2020, INDICATORS.iter().map(|s| s.to_string()).collect());
    y20.push("QATAR", [Some(2.0), None, None]);
    y20.push("CHAD", [0.5, 0.5, 0.5]);
    let data = build(&[y19, y20]).unwrap();

    let totals: Vec<f64> = data.by_year.rows_for("qatar").map(|r| r.total).collect();
    assert_eq!(totals.len(), 2);
    assert!(totals.contains(&1.5));
    assert!(totals.contains(&2.0));

    let q = data.by_country.find("qatar").unwrap();
    assert_eq!(q.values, vec![Some(1.5), None, Some(0.5)]);
    assert_eq!(q.total, 1.75);
    assert_eq!(q.rank, 1);
}

#[test]
fn duplicate_rows_average_only_present_cells() {
    let mut a = YearTable::new(2019, INDICATORS.iter().map(|s| s.to_string()).collect());
    a.push("PERU", [Some(1.0), None, Some(1.0)]);
    let mut b = YearTable::new(2019, INDICATORS.iter().map(|s| s.to_string()).collect());
    b.push("PERU", [Some(3.0), None, None]);
    let data = build(&[a, b]).unwrap();
    let peru = data.by_country.find("peru").unwrap();
    assert_eq!(peru.values, vec![Some(2.0), None, Some(1.0)]);
    assert_eq!(peru.total, 3.0);
}
