use vb_project::*;

fn sample_document() -> RequestDocument {
    RequestDocument {
        version: LATEST_VERSION,
        name: Some("Gear oil blend".to_string()),
        preferences: Preferences::for_language(Language::Fr),
        requests: vec![
            Request::TwoPoint(TwoPointRequest {
                first: MeasurementDef {
                    temperature: 40.0.into(),
                    value: "46".into(),
                },
                second: MeasurementDef {
                    temperature: 100.0.into(),
                    value: "6,8".into(),
                },
                evaluate_at: Some(20.0.into()),
            }),
            Request::TwoBases(TwoBasesRequest {
                target: 50.0.into(),
                base_a: 100.0.into(),
                base_b: 10.0.into(),
                known: vec![],
            }),
            Request::Blend(BlendRequest {
                components: vec![
                    BlendComponentDef {
                        name: Some("SN500".to_string()),
                        viscosity: 100.0.into(),
                        constraint: ConstraintDef::Free,
                    },
                    BlendComponentDef {
                        name: None,
                        viscosity: 10.0.into(),
                        constraint: ConstraintDef::ObjectiveMax,
                    },
                ],
                mixture: ConstraintDef::SetValue { value: "30".into() },
            }),
        ],
    }
}

#[test]
fn roundtrip_yaml() {
    let doc = sample_document();
    let path = std::env::temp_dir().join("vb_project_roundtrip.yaml");

    save_yaml(&path, &doc).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(doc, loaded);

    let by_extension = load(&path).unwrap();
    assert_eq!(doc, by_extension);
}

#[test]
fn roundtrip_json() {
    let doc = sample_document();
    let path = std::env::temp_dir().join("vb_project_roundtrip.json");

    save_json(&path, &doc).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(doc, loaded);
}

#[test]
fn hand_written_yaml_with_decimal_commas() {
    let yaml = r#"
version: 1
preferences:
  decimals: 3
requests:
  - kind: viscosity_index
    kv40: "46,0"
    kv100: 6.8
  - kind: mixture
    components:
      - { viscosity: 100, percent: "60" }
      - { viscosity: "10,0", percent: 40 }
  - kind: blend
    components:
      - viscosity: 150
      - viscosity: 46
        constraint: { type: range, min: "0", max: "80" }
      - viscosity: 10
    mixture: { type: range, min: 30, max: 60 }
"#;
    let doc: RequestDocument = serde_yaml::from_str(yaml).unwrap();
    validate_document(&doc).unwrap();
    assert_eq!(doc.preferences.decimals, 3);
    assert_eq!(doc.preferences.decimal_separator, DecimalSeparator::Point);

    let outcomes: Vec<Outcome> = doc.requests.iter().map(|r| evaluate(r).unwrap()).collect();

    match &outcomes[0] {
        Outcome::ViscosityIndex(vi) => assert_eq!(vi.index, 101.4),
        other => panic!("unexpected outcome {other:?}"),
    }
    match &outcomes[1] {
        Outcome::Mixture(m) => {
            assert!((m.viscosity - 33.558_638_998).abs() < 1e-6);
            assert_eq!(m.total_percent, 100.0);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    match &outcomes[2] {
        Outcome::Blend(b) => {
            assert_eq!(b.names[0], "Component 1");
            assert_eq!(b.solution.fractions, vec![33.33, 33.33, 33.33]);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn sample_document_evaluates() {
    let doc = sample_document();
    let prefs = doc.preferences;

    let Outcome::TwoPoint(line) = evaluate(&doc.requests[0]).unwrap() else {
        panic!("expected a line");
    };
    let (t, v) = line.evaluated.unwrap();
    assert_eq!(t, 20.0);
    assert!(v > 46.0);
    assert!(line.equation.starts_with("KV(T) = 10^(10^("));

    let Outcome::TwoBases(split) = evaluate(&doc.requests[1]).unwrap() else {
        panic!("expected a split");
    };
    assert!((split.percent_a + split.percent_b - 100.0).abs() < 1e-9);

    let Outcome::Blend(blend) = evaluate(&doc.requests[2]).unwrap() else {
        panic!("expected a blend");
    };
    assert_eq!(blend.names, vec!["SN500".to_string(), "Component 2".to_string()]);
    assert_eq!(format_number(blend.solution.fractions[0], &prefs), "55,26");
    assert_eq!(format_number(blend.solution.viscosity, &prefs), "30,00");
}

#[test]
fn invalid_documents_are_rejected_on_load() {
    let path = std::env::temp_dir().join("vb_project_invalid.yaml");
    std::fs::write(
        &path,
        "version: 1\nrequests:\n  - kind: two_bases\n    target: abc\n    base_a: 100\n    base_b: 10\n",
    )
    .unwrap();
    match load_yaml(&path) {
        Err(ProjectError::Validation(ValidationError::NotANumber { field, .. })) => {
            assert_eq!(field, "target");
        }
        other => panic!("expected a validation error, got {other:?}"),
    }

    std::fs::write(&path, "version: 1\nrequests:\n  - kind: unknown\n").unwrap();
    assert!(matches!(load_yaml(&path), Err(ProjectError::Yaml(_))));
}
