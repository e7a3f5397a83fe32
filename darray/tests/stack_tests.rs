use darray::DArray;

#[test]
fn test_push_sixteen_values_from_empty() {
    let mut array = DArray::<i32>::filled(0, 0).unwrap();

    for i in 0..=15 {
        array.push(i).unwrap();
    }

    assert_eq!(array.len(), 16);
    for i in 0..16 {
        assert_eq!(array[i], i as i32);
    }
}

#[test]
fn test_capacity_keeps_up_with_pushes() {
    let mut array = DArray::new().unwrap();

    for i in 0..1000u32 {
        array.push(i).unwrap();
        assert_eq!(array.len(), i as usize + 1);
        assert!(array.capacity() >= array.len());
    }
}

#[test]
fn test_pop_empty_array() {
    let mut array = DArray::<u8>::new().unwrap();
    assert_eq!(array.pop(), None);
}

#[test]
fn test_pop_operation() {
    let mut array = DArray::filled(0, 2).unwrap();
    array[0] = 3;
    array[1] = 5;

    assert_eq!(array.pop(), Some(5));
    assert_eq!(array.len(), 1);

    assert_eq!(array.pop(), Some(3));
    assert_eq!(array.len(), 0);

    assert_eq!(array.pop(), None);
}

#[test]
fn test_pop_never_changes_capacity() {
    let mut array = DArray::from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]).unwrap();
    let capacity = array.capacity();

    while array.pop().is_some() {
        assert_eq!(array.capacity(), capacity);
    }
    assert!(array.is_empty());
}

#[test]
fn test_push_then_pop_is_inverse() {
    let mut array = DArray::from_slice(&[1.5f64, 2.5]).unwrap();

    array.push(9.25).unwrap();
    assert_eq!(array.pop(), Some(9.25));
    assert_eq!(array.len(), 2);
    assert_eq!(array, [1.5, 2.5]);
}

#[test]
fn test_push_across_growth_keeps_values() {
    let mut array = DArray::new().unwrap();
    assert_eq!(array.capacity(), 10);

    for i in 0..11u16 {
        array.push(i).unwrap();
    }

    // 11 * 1.3 rounded up
    assert_eq!(array.capacity(), 15);
    assert_eq!(array, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
}

#[test]
fn test_clear_operation() {
    let mut array = DArray::from_slice(b"hello").unwrap();
    let capacity = array.capacity();

    array.clear();

    assert_eq!(array.len(), 0);
    assert!(array.is_empty());
    assert_eq!(array.capacity(), capacity);
}

#[test]
fn test_truncate() {
    let mut array = DArray::from_slice(&[1, 2, 3, 4]).unwrap();

    array.truncate(10);
    assert_eq!(array.len(), 4);

    array.truncate(2);
    assert_eq!(array, [1, 2]);
}
