use proptest::prelude::*;
use sc_atomic::AtomicInteger;

#[derive(Debug, Clone, Copy)]
enum FetchOp {
    Add,
    Sub,
    And,
    Xor,
    Or,
    Nand,
}

impl FetchOp {
    fn apply(self, a: i64, b: i64) -> i64 {
        match self {
            FetchOp::Add => a.wrapping_add(b),
            FetchOp::Sub => a.wrapping_sub(b),
            FetchOp::And => a & b,
            FetchOp::Xor => a ^ b,
            FetchOp::Or => a | b,
            FetchOp::Nand => !(a & b),
        }
    }

    fn get_and(self, cell: &AtomicInteger, v: i64) -> i64 {
        match self {
            FetchOp::Add => cell.get_and_add(v),
            FetchOp::Sub => cell.get_and_sub(v),
            FetchOp::And => cell.get_and_and(v),
            FetchOp::Xor => cell.get_and_xor(v),
            FetchOp::Or => cell.get_and_or(v),
            FetchOp::Nand => cell.get_and_nand(v),
        }
    }

    fn and_get(self, cell: &AtomicInteger, v: i64) -> i64 {
        match self {
            FetchOp::Add => cell.add_and_get(v),
            FetchOp::Sub => cell.sub_and_get(v),
            FetchOp::And => cell.and_and_get(v),
            FetchOp::Xor => cell.xor_and_get(v),
            FetchOp::Or => cell.or_and_get(v),
            FetchOp::Nand => cell.nand_and_get(v),
        }
    }
}

fn fetch_op() -> impl Strategy<Value = FetchOp> {
    prop_oneof![
        Just(FetchOp::Add),
        Just(FetchOp::Sub),
        Just(FetchOp::And),
        Just(FetchOp::Xor),
        Just(FetchOp::Or),
        Just(FetchOp::Nand),
    ]
}

proptest! {
    #[test]
    fn new_then_get_returns_initial(x in any::<i64>()) {
        prop_assert_eq!(AtomicInteger::new(x).get(), x);
    }

    #[test]
    fn set_then_get_returns_stored(x in any::<i64>(), y in any::<i64>()) {
        let cell = AtomicInteger::new(x);
        cell.set(y);
        prop_assert_eq!(cell.get(), y);
    }

    #[test]
    fn get_and_set_returns_previous(x in any::<i64>(), y in any::<i64>()) {
        let cell = AtomicInteger::new(x);
        prop_assert_eq!(cell.get_and_set(y), x);
        prop_assert_eq!(cell.get(), y);
    }

    #[test]
    fn compare_and_set_succeeds_iff_expected(
        x in any::<i64>(),
        use_current in any::<bool>(),
        other in any::<i64>(),
        update in any::<i64>(),
    ) {
        let expect = if use_current { x } else { other };
        let cell = AtomicInteger::new(x);
        let ok = cell.compare_and_set(expect, update);
        prop_assert_eq!(ok, expect == x);
        prop_assert_eq!(cell.get(), if ok { update } else { x });
    }

    #[test]
    fn weak_compare_and_set_never_succeeds_on_mismatch(
        x in any::<i64>(),
        expect in any::<i64>(),
        update in any::<i64>(),
    ) {
        let cell = AtomicInteger::new(x);
        let ok = cell.weak_compare_and_set(expect, update);
        if expect != x {
            prop_assert!(!ok);
        }
        prop_assert_eq!(cell.get(), if ok { update } else { x });
    }

    #[test]
    fn fetch_forms_agree_on_post_state(op in fetch_op(), a in any::<i64>(), v in any::<i64>()) {
        let before = AtomicInteger::new(a);
        let after = AtomicInteger::new(a);

        prop_assert_eq!(op.get_and(&before, v), a);
        prop_assert_eq!(op.and_get(&after, v), op.apply(a, v));
        prop_assert_eq!(before.get(), after.get());
    }
}
