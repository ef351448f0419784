use proptest::prelude::*;

use crate::DynArray;

#[derive(Clone, Debug)]
enum Append {
    One(u32),
    Batch(Vec<u32>),
    Slice(Vec<u32>),
}

fn arb_append() -> impl Strategy<Value = Append> {
    prop_oneof![
        any::<u32>().prop_map(Append::One),
        proptest::collection::vec(any::<u32>(), 0..20).prop_map(Append::Batch),
        proptest::collection::vec(any::<u32>(), 0..20).prop_map(Append::Slice),
    ]
}

#[derive(Clone, Debug)]
enum Op {
    Push(i32),
    Pop,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![3 => any::<i32>().prop_map(Op::Push), 1 => Just(Op::Pop)]
}

proptest! {
    #[test]
    fn push_pop_matches_model(ops in proptest::collection::vec(arb_op(), 0..200)) {
        let mut array = DynArray::new();
        let mut model = Vec::new();
        for op in ops {
            match op {
                Op::Push(v) => {
                    array.push_back(v);
                    model.push(v);
                }
                Op::Pop => {
                    if !model.is_empty() {
                        array.pop_back();
                        model.pop();
                    }
                }
            }
            prop_assert!(array.len() <= array.capacity());
        }
        prop_assert_eq!(array.as_slice(), model.as_slice());
    }

    #[test]
    fn appends_grow_to_need_or_doubling(
        start in proptest::collection::vec(any::<u32>(), 0..10),
        appends in proptest::collection::vec(arb_append(), 0..60),
    ) {
        let mut array = DynArray::from(start.as_slice());
        let mut model = start.clone();
        prop_assert_eq!(array.capacity(), start.len());

        for append in appends {
            let before = array.capacity();
            match append {
                Append::One(v) => {
                    array.push_back(v);
                    model.push(v);
                }
                Append::Batch(items) => {
                    model.extend_from_slice(&items);
                    array.extend(items);
                }
                Append::Slice(items) => {
                    array.extend_from_slice(&items);
                    model.extend_from_slice(&items);
                }
            }
            let after = array.capacity();
            if after != before {
                let doubled = if before == 0 { 1 } else { before * 2 };
                prop_assert_eq!(after, array.len().max(doubled));
            }
        }
        prop_assert_eq!(array.as_slice(), model.as_slice());
    }

    #[test]
    fn clone_is_independent(
        items in proptest::collection::vec(any::<i64>(), 1..64),
        replacement in any::<i64>(),
    ) {
        let original = DynArray::from(items.as_slice());
        let mut copy = original.clone();
        prop_assert_eq!(copy.len(), original.len());
        prop_assert_eq!(copy.capacity(), original.len());
        prop_assert_eq!(&copy, &original);

        copy[0] = replacement;
        copy.push_back(replacement);
        prop_assert_eq!(original.as_slice(), items.as_slice());
    }

    #[test]
    fn growth_is_doubling(n in 1usize..600) {
        let mut array = DynArray::new();
        let mut last = 0;
        for i in 0..n {
            array.push_back(i);
            let cap = array.capacity();
            prop_assert!(cap >= last);
            prop_assert_eq!(cap, array.len().next_power_of_two());
            last = cap;
        }
    }

    #[test]
    fn reserve_then_fill_keeps_capacity(n in 0usize..300) {
        let mut array = DynArray::new();
        array.reserve(n);
        prop_assert_eq!(array.capacity(), n);
        for i in 0..n {
            array.push_back(i);
            prop_assert_eq!(array.capacity(), n);
        }
    }

    #[test]
    fn insert_then_erase_restores(
        items in proptest::collection::vec(any::<u16>(), 0..50),
        pos_seed in any::<usize>(),
        value in any::<u16>(),
    ) {
        let mut array = DynArray::from(items.as_slice());
        let pos = pos_seed % (items.len() + 1);

        let at = array.insert(pos, value);
        prop_assert_eq!(at, pos);
        prop_assert_eq!(array[pos], value);

        let next = array.erase(pos);
        prop_assert_eq!(next, pos);
        prop_assert_eq!(array.as_slice(), items.as_slice());
    }

    #[test]
    fn erase_range_matches_drain(
        items in proptest::collection::vec(any::<u8>(), 0..60),
        a in any::<usize>(),
        b in any::<usize>(),
    ) {
        let bound = items.len() + 1;
        let (first, last) = {
            let (x, y) = (a % bound, b % bound);
            (x.min(y), x.max(y))
        };
        let mut array = DynArray::from(items.as_slice());
        let mut model = items.clone();
        model.drain(first..last);

        let next = array.erase_range(first, last);
        prop_assert_eq!(next, first);
        prop_assert_eq!(array.len(), items.len() - (last - first));
        prop_assert_eq!(array.as_slice(), model.as_slice());
    }

    #[test]
    fn shrink_to_fit_matches_len(
        items in proptest::collection::vec(any::<i32>(), 0..100),
        drop_count in 0usize..100,
    ) {
        let mut array: DynArray<i32> = items.iter().copied().collect();
        array.truncate(items.len().saturating_sub(drop_count));
        let expected = array.as_slice().to_vec();

        array.shrink_to_fit();
        prop_assert_eq!(array.capacity(), array.len());
        prop_assert_eq!(array.as_slice(), expected.as_slice());
    }
}
