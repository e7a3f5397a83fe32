use darray::DArray;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Push(i16),
    Pop,
    Insert(usize, i16),
    Remove(usize),
    SwapRemove(usize),
    RemoveRange(usize, usize),
    Swap(usize, usize),
    Extend(Vec<i16>),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i16>().prop_map(Op::Push),
        Just(Op::Pop),
        (any::<usize>(), any::<i16>()).prop_map(|(i, v)| Op::Insert(i, v)),
        any::<usize>().prop_map(Op::Remove),
        any::<usize>().prop_map(Op::SwapRemove),
        (any::<usize>(), 0usize..5).prop_map(|(i, n)| Op::RemoveRange(i, n)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Swap(a, b)),
        proptest::collection::vec(any::<i16>(), 0..20).prop_map(Op::Extend),
    ]
}

proptest! {
    #[test]
    fn pushes_keep_length_and_order(values in proptest::collection::vec(any::<u32>(), 0..300)) {
        let mut array = DArray::new().unwrap();
        for (n, value) in values.iter().enumerate() {
            array.push(*value).unwrap();
            prop_assert_eq!(array.len(), n + 1);
            prop_assert!(array.capacity() >= array.len());
        }
        let collected: Vec<u32> = array.iter().copied().collect();
        prop_assert_eq!(collected, values);
    }

    #[test]
    fn push_then_pop_is_inverse(
        values in proptest::collection::vec(any::<u8>(), 0..50),
        extra in any::<u8>(),
    ) {
        let mut array = DArray::from_slice(&values).unwrap();
        array.push(extra).unwrap();
        let capacity = array.capacity();

        prop_assert_eq!(array.pop(), Some(extra));
        prop_assert_eq!(array.capacity(), capacity);
        prop_assert_eq!(array.as_slice(), values.as_slice());
    }

    #[test]
    fn insert_then_remove_restores_content(
        values in proptest::collection::vec(any::<i64>(), 0..50),
        index in any::<usize>(),
        extra in any::<i64>(),
    ) {
        let index = index % (values.len() + 1);
        let mut array = DArray::from_slice(&values).unwrap();

        array.insert(index, extra).unwrap();
        prop_assert_eq!(array[index], extra);
        prop_assert_eq!(array.remove(index), Ok(extra));

        let mut expected = values.clone();
        let mut actual: Vec<i64> = array.iter().copied().collect();
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn repeated_insert_preserves_previous_order(
        values in proptest::collection::vec(0u16..1000, 1..40),
        positions in proptest::collection::vec(any::<usize>(), 1..40),
    ) {
        let mut array = DArray::from_slice(&values).unwrap();
        for (marker, position) in positions.iter().enumerate() {
            let index = position % (array.len() + 1);
            array.insert(index, 1000 + marker as u16).unwrap();
        }

        prop_assert_eq!(array.len(), values.len() + positions.len());
        let original: Vec<u16> = array.iter().copied().filter(|v| *v < 1000).collect();
        prop_assert_eq!(original, values);
    }

    #[test]
    fn remove_range_is_order_preserving(
        values in proptest::collection::vec(any::<u8>(), 0..60),
        start in any::<usize>(),
        count in any::<usize>(),
    ) {
        let start = start % (values.len() + 1);
        let count = count % (values.len() - start + 1);
        let mut array = DArray::from_slice(&values).unwrap();

        array.remove_range(start, count).unwrap();

        let mut expected = values.clone();
        expected.drain(start..start + count);
        prop_assert_eq!(array.as_slice(), expected.as_slice());
    }

    #[test]
    fn reserve_twice_keeps_the_same_block(
        len in 0usize..100,
        extra in 0usize..500,
    ) {
        let mut array = DArray::filled(1u32, len).unwrap();
        array.reserve(extra).unwrap();
        prop_assert!(array.capacity() >= len + extra);

        let before = array.as_ptr();
        array.reserve(extra).unwrap();
        prop_assert_eq!(array.as_ptr(), before);
        prop_assert_eq!(array.len(), len);
    }

    #[test]
    fn concatenate_length_law(
        dest in proptest::collection::vec(any::<i32>(), 0..80),
        source in proptest::collection::vec(any::<i32>(), 0..80),
    ) {
        let mut array = DArray::from_slice(&dest).unwrap();
        array.extend_from_slice(&source).unwrap();

        prop_assert_eq!(array.len(), dest.len() + source.len());
        prop_assert_eq!(&array[..dest.len()], dest.as_slice());
        prop_assert_eq!(&array[dest.len()..], source.as_slice());
    }

    #[test]
    fn behaves_like_vec(ops in proptest::collection::vec(arb_op(), 0..200)) {
        let mut array = DArray::new().unwrap();
        let mut model: Vec<i16> = Vec::new();

        for op in ops {
            match op {
                Op::Push(v) => {
                    array.push(v).unwrap();
                    model.push(v);
                }
                Op::Pop => {
                    prop_assert_eq!(array.pop(), model.pop());
                }
                Op::Insert(i, v) => {
                    let i = i % (model.len() + 1);
                    array.insert(i, v).unwrap();
                    model.insert(i, v);
                }
                Op::Remove(i) => {
                    if model.is_empty() {
                        prop_assert!(array.remove(i).is_err());
                    } else {
                        let i = i % model.len();
                        prop_assert_eq!(array.remove(i), Ok(model.remove(i)));
                    }
                }
                Op::SwapRemove(i) => {
                    if model.is_empty() {
                        prop_assert!(array.swap_remove(i).is_err());
                    } else {
                        let i = i % model.len();
                        prop_assert_eq!(array.swap_remove(i), Ok(model.swap_remove(i)));
                    }
                }
                Op::RemoveRange(i, n) => {
                    let i = i % (model.len() + 1);
                    let n = n.min(model.len() - i);
                    array.remove_range(i, n).unwrap();
                    model.drain(i..i + n);
                }
                Op::Swap(a, b) => {
                    if model.is_empty() {
                        prop_assert!(array.swap(a, b).is_err());
                    } else {
                        let (a, b) = (a % model.len(), b % model.len());
                        array.swap(a, b).unwrap();
                        model.swap(a, b);
                    }
                }
                Op::Extend(items) => {
                    array.extend_from_slice(&items).unwrap();
                    model.extend_from_slice(&items);
                }
            }
            prop_assert!(array.capacity() >= array.len());
            prop_assert_eq!(array.as_slice(), model.as_slice());
        }
    }
}
