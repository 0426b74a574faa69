//! End-to-end runs of the analysis over small datasets.

use std::collections::BTreeSet;

use skyline_lens::analysis::subspace::Subspace;
use skyline_lens::data::loader::{dataset_from_csv_str, parse_json};
use skyline_lens::data::model::ColumnKind;
use skyline_lens::{Analysis, AnalysisOptions, Dataset};

fn keys(list: Vec<&str>) -> BTreeSet<String> {
    list.into_iter().map(String::from).collect()
}

#[test]
fn speed_power_scenario() {
    let ds = dataset_from_csv_str("id,speed,power\n1,5,5\n2,3,8\n3,2,2\n4,5,5\n").unwrap();
    let analysis = Analysis::run(&ds);

    assert_eq!(keys(analysis.skyline_keys(&ds)), keys(vec!["1", "2", "4"]));
    assert_eq!(analysis.dominated_keys(&ds), vec!["3"]);

    let score = |key: &str| analysis.domination_score(ds.index_of_key(key).unwrap());
    assert_eq!(score("1"), Some(1));
    assert_eq!(score("4"), Some(1));
    assert_eq!(score("2"), Some(0));
    assert_eq!(analysis.scores.dominated[0], vec![2]);
}

#[test]
fn single_attribute_with_ties() {
    let ds = dataset_from_csv_str("id,score\na,10\nb,20\nc,20\nd,5\n").unwrap();
    let analysis = Analysis::run(&ds);

    assert_eq!(analysis.skyline_keys(&ds), vec!["b", "c"]);
    assert_eq!(analysis.dominated_keys(&ds), vec!["a", "d"]);
    // Both leaders are explained by the one attribute.
    assert_eq!(analysis.decisive.get("b"), &[Subspace::from_attributes([0])]);
    assert_eq!(analysis.decisive.get("c"), &[Subspace::from_attributes([0])]);
}

#[test]
fn no_numeric_attributes() {
    let ds = dataset_from_csv_str("id,name,colour\n1,a,red\n2,b,blue\n3,c,red\n").unwrap();
    assert!(ds.attributes().is_empty());
    let analysis = Analysis::run(&ds);

    assert_eq!(analysis.skyline.len(), 3);
    assert!(analysis.skyline.dominated.is_empty());
    assert!(analysis.decisive.is_empty());
    assert_eq!(analysis.scores.scores, vec![0, 0, 0]);
    assert_eq!(analysis.scores.percentage(1), 0.0);
}

#[test]
fn empty_dataset() {
    let ds = dataset_from_csv_str("id,a,b\n").unwrap();
    let analysis = Analysis::run(&ds);
    assert!(analysis.skyline.is_empty());
    assert!(analysis.decisive.is_empty());
    assert_eq!((analysis.scores.min, analysis.scores.max), (0, 0));
}

#[test]
fn missing_values_are_the_worst_value() {
    // b has no speed; it ties a on power and so is dominated.
    let ds = dataset_from_csv_str("id,speed,power\na,1,5\nb,,5\nc,3,1\n").unwrap();
    let analysis = Analysis::run(&ds);
    assert_eq!(analysis.skyline_keys(&ds), vec!["a", "c"]);
    assert_eq!(analysis.dominated_keys(&ds), vec!["b"]);
}

#[test]
fn decisive_subspaces_explain_each_trade_off() {
    // Three attributes; every point wins on a different combination.
    let ds = dataset_from_csv_str(
        "id,a,b,c\n\
         p,9,1,2\n\
         q,1,9,3\n\
         r,2,2,9\n\
         s,6,6,1\n",
    )
    .unwrap();
    let analysis = Analysis::run(&ds);
    assert_eq!(analysis.skyline.len(), 4);

    assert_eq!(analysis.decisive.get("p"), &[Subspace::from_attributes([0])]);
    assert_eq!(analysis.decisive.get("q"), &[Subspace::from_attributes([1])]);
    assert_eq!(analysis.decisive.get("r"), &[Subspace::from_attributes([2])]);
    assert_eq!(analysis.decisive.get("s"), &[Subspace::from_attributes([0, 1])]);

    let rows = analysis.decisive.display_rows("s", 3);
    assert_eq!(rows.attribute_rows, vec![vec![0], vec![0], vec![]]);
    assert_eq!(
        analysis.decisive.get("s")[0].names(ds.attributes()),
        vec!["a", "b"]
    );
}

#[test]
fn decisive_subspaces_are_minimal() {
    let ds = dataset_from_csv_str(
        "id,a,b,c,d\n\
         p1,9,2,4,4\n\
         p2,2,9,3,5\n\
         p3,5,5,5,5\n\
         p4,4,6,9,1\n\
         p5,7,3,2,8\n\
         p6,1,1,1,1\n",
    )
    .unwrap();
    let analysis = Analysis::run(&ds);
    for (_, subspaces) in analysis.decisive.iter() {
        for (i, a) in subspaces.iter().enumerate() {
            for (j, b) in subspaces.iter().enumerate() {
                if i != j {
                    assert!(!a.is_subset_of(*b), "{a} ⊆ {b}");
                }
            }
        }
    }
}

#[test]
fn divergence_profiles_cover_every_attribute_and_record() {
    let ds = dataset_from_csv_str("id,a,b\nr0,3,1\nr1,1,3\nr2,2,2\n").unwrap();
    let analysis = Analysis::run(&ds);
    for attr in 0..ds.attributes().len() {
        for r in 0..ds.len() {
            let profile = analysis.divergence.profile(attr, r);
            assert_eq!(profile.len(), ds.len());
            assert_eq!(profile.entry(profile.reference_position).record, r);
            let values: Vec<f64> = profile
                .entries()
                .map(|e| ds.records[e.record].numeric(ds.attributes().column(attr)).unwrap())
                .collect();
            assert!(values.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}

#[test]
fn json_and_csv_inputs_agree() {
    let csv = dataset_from_csv_str("id,speed,power\n1,5,5\n2,3,8\n3,2,2\n").unwrap();
    let json = Dataset::from_table(
        parse_json(
            r#"[{"id":"1","speed":5,"power":5},{"id":"2","speed":3,"power":8},{"id":"3","speed":2,"power":2}]"#,
        )
        .unwrap(),
    )
    .unwrap();
    let options = AnalysisOptions {
        parallel: false,
        ..AnalysisOptions::default()
    };
    let a = Analysis::run_with(&csv, &options);
    let b = Analysis::run_with(&json, &options);
    assert_eq!(a.skyline, b.skyline);
    assert_eq!(a.decisive, b.decisive);
    assert_eq!(a.scores, b.scores);
}

#[test]
fn wide_tables_use_every_attribute() {
    let header: Vec<String> = (0..65).map(|i| format!("c{i}")).collect();
    let a = vec!["1"; 65];
    let mut b = a.clone();
    b[64] = "2";
    let csv = format!(
        "id,{}\na,{}\nb,{}\n",
        header.join(","),
        a.join(","),
        b.join(",")
    );
    let ds = dataset_from_csv_str(&csv).unwrap();
    assert_eq!(ds.attributes().len(), 65);

    let analysis = Analysis::run(&ds);
    assert_eq!(analysis.skyline_keys(&ds), vec!["b"]);
    assert_eq!(analysis.dominated_keys(&ds), vec!["a"]);
    assert_eq!(analysis.domination_score(1), Some(1));
    // Too wide to mine.
    assert!(analysis.decisive.is_empty());
    assert!(analysis.divergence.deviation(0, 1) > 0.0);
}

#[test]
fn infinite_cells_make_a_column_nominal() {
    let ds = dataset_from_csv_str("id,a,b\nx,1,0\ny,2,5\nz,inf,3\n").unwrap();
    assert_eq!(ds.kinds[1], ColumnKind::Nominal);
    assert_eq!(ds.attributes().names(), &["b"]);

    let analysis = Analysis::run(&ds);
    assert!(analysis.divergence.sigma(0) > 0.0);
    assert!(analysis.divergence.deviation(0, 1) > 0.0);
    assert_eq!(analysis.skyline_keys(&ds), vec!["y"]);
    assert_eq!(analysis.ranges[0].to_string(), "5 ~ 5");
}
