use crate::classifier::{Classification, ResponseWindow, WINDOW_SIZE};

#[test]
fn test_classify_empty_window() {
    let window = ResponseWindow::new();

    assert!(window.is_empty());
    assert_eq!(Classification::Pending, window.classify());
}

#[test]
fn test_classify_ok() {
    let mut window = ResponseWindow::new();
    window.extend(b"AT+CWMODE_CUR=1\r\n\r\nOK\r\n");

    assert_eq!(Classification::Success, window.classify());
}

#[test]
fn test_classify_already_connected() {
    let mut window = ResponseWindow::new();
    window.extend(b"ALREADY CONNECTED\r\n");

    assert_eq!(Classification::Success, window.classify());
}

#[test]
fn test_classify_error() {
    let mut window = ResponseWindow::new();
    window.extend(b"busy p...\r\nERROR\r\n");

    assert_eq!(Classification::Failure, window.classify());
}

#[test]
fn test_classify_send_fail() {
    let mut window = ResponseWindow::new();
    window.extend(b"Recv 54 bytes\r\n\r\nSEND FAIL\r\n");

    assert_eq!(Classification::Failure, window.classify());
}

#[test]
fn test_classify_no_token() {
    let mut window = ResponseWindow::new();
    window.extend(b"WIFI CONNECTED\r\nWIFI GOT IP\r\n");

    assert_eq!(Classification::Pending, window.classify());
}

#[test]
fn test_classify_case_sensitive() {
    let mut window = ResponseWindow::new();
    window.extend(b"ok\r\nerror\r\n");

    assert_eq!(Classification::Pending, window.classify());
}

#[test]
fn test_classify_success_takes_precedence() {
    let mut window = ResponseWindow::new();
    window.extend(b"ERROR\r\nOK\r\n");

    assert_eq!(Classification::Success, window.classify());
}

#[test]
fn test_classify_substring_match() {
    let mut window = ResponseWindow::new();
    window.extend(b"SEND OK\r\n");
    assert_eq!(Classification::Success, window.classify());

    let mut window = ResponseWindow::new();
    window.extend(b"BROKEN PIPE");
    assert_eq!(Classification::Success, window.classify());
}

#[test]
fn test_token_spanning_multiple_chunks() {
    let mut window = ResponseWindow::new();
    window.extend(b"SEND F");
    assert_eq!(Classification::Pending, window.classify());

    window.extend(b"AIL\r\n");
    assert_eq!(Classification::Failure, window.classify());
}

#[test]
fn test_extend_keeps_order() {
    let mut window = ResponseWindow::new();
    window.extend(b"abc");
    window.extend(b"def");

    assert_eq!(6, window.len());
    assert_eq!(b"abcdef", window.as_bytes());
}

#[test]
fn test_extend_drops_oldest_bytes() {
    let mut window = ResponseWindow::new();
    window.extend(b"ERROR");
    window.extend(&[b'x'; WINDOW_SIZE - 3]);

    assert_eq!(WINDOW_SIZE, window.len());
    assert_eq!(b"ROR", &window.as_bytes()[..3]);
    assert_eq!(Classification::Pending, window.classify());
}

#[test]
fn test_extend_larger_than_window() {
    let mut data = [b'x'; WINDOW_SIZE + 50];
    data[0] = b'O';
    data[1] = b'K';
    data[WINDOW_SIZE + 45..].copy_from_slice(b"ERROR");

    let mut window = ResponseWindow::new();
    window.extend(b"OK");
    window.extend(&data);

    assert_eq!(WINDOW_SIZE, window.len());
    assert_eq!(&data[50..], window.as_bytes());
    assert_eq!(Classification::Failure, window.classify());
}

#[test]
fn test_window_never_exceeds_size() {
    let mut window = ResponseWindow::new();

    for _ in 0..100 {
        window.extend(b"WIFI GOT IP\r\n");
        assert!(window.len() <= WINDOW_SIZE);
    }

    assert_eq!(WINDOW_SIZE, window.len());
    assert!(window.as_bytes().ends_with(b"WIFI GOT IP\r\n"));
}
