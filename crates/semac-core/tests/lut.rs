use semac_core::{LutTable, Model, TransitionTable, UniformSource};

fn table(text: &str) -> TransitionTable {
    TransitionTable::parse(text.as_bytes()).unwrap()
}

#[test]
fn arrows_match_hand_computed_cdf() {
    // A -> B with 0.25, A -> C with 0.75; normalized CDF [0.25, 1.0].
    let t = table("A;A\nB;C\nage;age\n0.25;0.75\n");
    let lut = LutTable::build(&t, 4);
    let a = t.id_of("A").unwrap();
    let b = t.id_of("B").unwrap();
    let c = t.id_of("C").unwrap();

    // Bucket thresholds ru = 0.25, 0.5, 0.75, 1.0.
    assert_eq!(lut.arrow(a, 0), b);
    assert_eq!(lut.arrow(a, 1), c);
    assert_eq!(lut.arrow(a, 2), c);
    assert_eq!(lut.arrow(a, 3), c);
}

#[test]
fn unnormalized_rows_are_rescaled() {
    // Raw probabilities sum to 0.5; the builder rescales them to a full
    // CDF, so half the buckets go each way.
    let t = table("A;A\nB;C\nage;age\n0.25;0.25\n");
    let lut = LutTable::build(&t, 8);
    let a = t.id_of("A").unwrap();
    let b = t.id_of("B").unwrap();
    let c = t.id_of("C").unwrap();
    for bucket in 0..4 {
        assert_eq!(lut.arrow(a, bucket), b);
    }
    for bucket in 4..8 {
        assert_eq!(lut.arrow(a, bucket), c);
    }
}

#[test]
fn zero_total_rows_arrow_to_the_last_target() {
    let t = table("A;A\nB;C\nage;age\n0.0;0.0\n");
    let lut = LutTable::build(&t, 4);
    let a = t.id_of("A").unwrap();
    let c = t.id_of("C").unwrap();
    for bucket in 0..4 {
        assert_eq!(lut.arrow(a, bucket), c);
    }
}

#[test]
fn absorbing_states_arrow_home() {
    let t = table("A\nD\nage\n1.0\n");
    let lut = LutTable::build(&t, 16);
    let d = t.id_of("D").unwrap();
    for bucket in 0..16 {
        assert_eq!(lut.arrow(d, bucket), d);
    }
}

#[test]
fn bucket_index_is_clamped() {
    let t = table("A\nB\nage\n1.0\n");
    let lut = LutTable::build(&t, 1024);
    assert_eq!(lut.bucket_of(0.0), 0);
    assert_eq!(lut.bucket_of(0.999_999), 1023);
    // Caller-supplied uniforms may sit exactly on 1.0.
    assert_eq!(lut.bucket_of(1.0), 1023);
}

#[test]
fn lut_matches_exact_on_duration_invariant_chains() {
    // Deterministic A -> B -> C cascade; duration plays no role, so both
    // steppers must walk identical paths from identical uniforms.
    let text = "A;B;C\nB;C;C\nstate;state;state\n1.0;1.0;1.0\n1.0;1.0;1.0\n1.0;1.0;1.0\n";
    let mut src = UniformSource::seeded(7);
    let uniforms = src.matrix(10, 32);

    let mut exact = Model::from_table(table(text));
    exact.initialize_batch(32, "A", 0, 0, 0).unwrap();
    let mut lut = Model::from_table(table(text));
    lut.initialize_batch(32, "A", 0, 0, 0).unwrap();
    lut.build_lut(256);

    for t in 0..10 {
        exact.step_batch(uniforms.row(t));
        lut.step_batch_lut(uniforms.row(t)).unwrap();
        assert_eq!(exact.batch().states, lut.batch().states);
        assert_eq!(exact.batch().dur_in_state, lut.batch().dur_in_state);
        assert_eq!(exact.batch().dur_since_b, lut.batch().dur_since_b);
    }
}

#[test]
fn lut_diverges_on_duration_varying_tables() {
    // The transition only becomes possible at duration 1, but the LUT is
    // built from the duration-0 slice (zero row, rescue rule arrows to
    // the last target), so the two algorithms disagree from step one.
    let text = "A\nC\nstate\n0.0\n1.0\n";
    let mut exact = Model::from_table(table(text));
    exact.initialize_batch(1, "A", 0, 0, 0).unwrap();
    let mut lut = Model::from_table(table(text));
    lut.initialize_batch(1, "A", 0, 0, 0).unwrap();
    lut.build_lut(64);

    exact.step_batch(&[0.5]);
    lut.step_batch_lut(&[0.5]).unwrap();
    assert_eq!(exact.batch().states[0], exact.table().id_of("A").unwrap());
    assert_eq!(lut.batch().states[0], lut.table().id_of("C").unwrap());
}

#[test]
fn step_batch_lut_without_build_fails() {
    let mut m = Model::from_table(table("A\nB\nage\n1.0\n"));
    m.initialize_batch(1, "A", 0, 0, 0).unwrap();
    assert!(matches!(
        m.step_batch_lut(&[0.5]),
        Err(semac_core::CoreError::LutNotBuilt)
    ));
}
