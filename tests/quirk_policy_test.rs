use crossval::arch::{m6800, m6809, mcs48};
use crossval::quirk::{
    CaseExclusion, OpcodeSet, PolicyError, QuirkKind, QuirkPolicy, QuirkRule, ToleranceGate,
};

#[test]
fn opcode_set_selectors() {
    assert!(OpcodeSet::Exact(0x55).contains(0x55));
    assert!(!OpcodeSet::Exact(0x55).contains(0x54));

    // JBb bit pattern: x2 column with bit 4 clear.
    let jbb = OpcodeSet::Masked {
        mask: 0x1F,
        value: 0x12,
    };
    for op in [0x12, 0x32, 0x52, 0x72, 0x92, 0xB2, 0xD2, 0xF2] {
        assert!(jbb.contains(op), "JBb opcode {op:#04x}");
    }
    assert!(!jbb.contains(0x02));
    assert!(!jbb.contains(0x13));

    let djnz = OpcodeSet::Range(0xE8..=0xEF);
    assert!(djnz.contains(0xE8));
    assert!(djnz.contains(0xEF));
    assert!(!djnz.contains(0xF0));

    let sel_mb = OpcodeSet::List(&[0xE5, 0xF5]);
    assert!(sel_mb.contains(0xE5));
    assert!(!sel_mb.contains(0xD5));
}

#[test]
fn overlapping_rules_on_same_field_rejected() {
    let rules = vec![
        QuirkRule {
            opcodes: OpcodeSet::Exact(0x10),
            fields: &["pc"],
            kind: QuirkKind::Exclude,
            rationale: "first claim",
        },
        QuirkRule {
            opcodes: OpcodeSet::Range(0x00..=0x20),
            fields: &["pc"],
            kind: QuirkKind::Narrow { mask: 0xFF },
            rationale: "second claim",
        },
    ];
    let err = QuirkPolicy::new(rules, Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        PolicyError::Overlap {
            field: "pc",
            opcode: 0x10
        }
    ));
}

#[test]
fn disjoint_rules_on_same_field_accepted() {
    let rules = vec![
        QuirkRule {
            opcodes: OpcodeSet::Exact(0x10),
            fields: &["pc"],
            kind: QuirkKind::Exclude,
            rationale: "one opcode",
        },
        QuirkRule {
            opcodes: OpcodeSet::Exact(0x11),
            fields: &["pc"],
            kind: QuirkKind::Exclude,
            rationale: "another opcode",
        },
    ];
    assert!(QuirkPolicy::new(rules, Vec::new()).is_ok());
}

#[test]
fn distinct_fields_on_same_opcode_accepted() {
    let rules = vec![
        QuirkRule {
            opcodes: OpcodeSet::Exact(0x55),
            fields: &["t"],
            kind: QuirkKind::Exclude,
            rationale: "timer",
        },
        QuirkRule {
            opcodes: OpcodeSet::Exact(0x55),
            fields: &["pc"],
            kind: QuirkKind::Tolerance {
                wrap_mask: 0xFFF,
                deltas: &[0x100],
                gate: ToleranceGate::Always,
            },
            rationale: "page",
        },
    ];
    assert!(QuirkPolicy::new(rules, Vec::new()).is_ok());
}

#[test]
fn case_exclusion_lookup() {
    let policy = QuirkPolicy::new(
        Vec::new(),
        vec![CaseExclusion {
            opcodes: OpcodeSet::Range(0x9C..=0x9F),
            rationale: "broken operand source",
        }],
    )
    .unwrap();
    assert!(policy.case_exclusion(0x9C).is_some());
    assert!(policy.case_exclusion(0x9F).is_some());
    assert!(policy.case_exclusion(0x9B).is_none());
}

#[test]
fn mcs48_table_is_disjoint_and_complete() {
    let policy = mcs48::policy();

    // STRT T skips both timer fields but nothing else.
    assert!(policy.field_rule(0x55, "t").is_some());
    assert!(policy.field_rule(0x55, "timer_overflow").is_some());
    assert!(policy.field_rule(0x55, "a").is_none());

    // SEL MB0/MB1 skip the live bank bit only.
    assert!(matches!(
        policy.field_rule(0xE5, "a11").map(|r| &r.kind),
        Some(QuirkKind::Exclude)
    ));
    assert!(policy.field_rule(0xE5, "a11_pending").is_none());

    // Every conditional branch family carries the PC tolerance.
    for op in [0xF6, 0x12, 0xE8] {
        assert!(
            matches!(
                policy.field_rule(op, "pc").map(|r| &r.kind),
                Some(QuirkKind::Tolerance { .. })
            ),
            "pc tolerance for opcode {op:#04x}"
        );
    }
    assert!(policy.field_rule(0x00, "pc").is_none());

    // External memory is load-only for every opcode.
    assert!(matches!(
        policy.field_rule(0x00, "ram").map(|r| &r.kind),
        Some(QuirkKind::Exclude)
    ));

    // ANLD family is excluded wholesale.
    for op in 0x9C..=0x9F {
        assert!(policy.case_exclusion(op).is_some(), "ANLD {op:#04x}");
    }
    assert!(policy.case_exclusion(0x9B).is_none());
}

#[test]
fn m6800_table_masks_undefined_cc_bits() {
    let policy = m6800::policy();
    assert!(matches!(
        policy.field_rule(0x00, "cc").map(|r| &r.kind),
        Some(QuirkKind::Narrow { mask: 0x3F })
    ));
    assert!(policy.field_rule(0x00, "a").is_none());
    assert!(policy.case_exclusion(0x00).is_none());
}

#[test]
fn m6809_table_is_empty() {
    let policy = m6809::policy();
    for op in [0x00u8, 0x86, 0xFF] {
        assert!(policy.field_rule(op, "pc").is_none());
        assert!(policy.field_rule(op, "cc").is_none());
        assert!(policy.case_exclusion(op).is_none());
    }
}
