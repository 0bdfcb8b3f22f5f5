use crate::request::{
    RequestError, Security, UploadRequest, FORMS_ENDPOINT, METRICS_ENDPOINT, REQUEST_CAPACITY, WEBHOOK_ENDPOINT,
};
use alloc::string::String;

#[test]
fn test_metrics_request() {
    let request = UploadRequest::metrics("KEY1", &[21.5, 40.0]).unwrap();

    assert_eq!("GET /update?key=KEY1&field1=21.5&field2=40", request.text());
    assert_eq!(&METRICS_ENDPOINT, request.endpoint());
    assert_eq!(request.text().len() + 2, request.send_length());
    assert!(!request.closes_socket());
    assert!(!request.requires_ssl_buffer());
}

#[test]
fn test_metrics_request_all_fields() {
    let fields = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    let request = UploadRequest::metrics("KEY1", &fields).unwrap();

    assert_eq!(
        "GET /update?key=KEY1&field1=1&field2=2&field3=3&field4=4&field5=5&field6=6&field7=7&field8=8",
        request.text()
    );
    assert_eq!(94, request.send_length());
}

#[test]
fn test_metrics_request_without_fields() {
    let request = UploadRequest::metrics("KEY1", &[]).unwrap();
    assert_eq!("GET /update?key=KEY1", request.text());
}

#[test]
fn test_metrics_request_negative_value() {
    let request = UploadRequest::metrics("KEY1", &[-3.25]).unwrap();
    assert_eq!("GET /update?key=KEY1&field1=-3.25", request.text());
}

#[test]
fn test_metrics_request_large_integer_values() {
    let request = UploadRequest::metrics("KEY1", &[123456789.0, 16777217.0]).unwrap();

    assert_eq!("GET /update?key=KEY1&field1=123456789&field2=16777217", request.text());
    assert_eq!(request.text().len() + 2, request.send_length());
}

#[test]
fn test_webhook_request_large_integer_value() {
    let request = UploadRequest::webhook("K", "evt", &[123456789.0]).unwrap();
    assert_eq!("GET /trigger/evt/with/key/K?value1=123456789", request.text());
}

#[test]
fn test_metrics_request_too_many_fields() {
    let fields = [0.0; 9];
    let error = UploadRequest::metrics("KEY1", &fields).unwrap_err();

    assert_eq!(RequestError::TooManyValues, error);
}

#[test]
fn test_webhook_request() {
    let request = UploadRequest::webhook("K", "evt", &[1.0, 2.0, 3.0]).unwrap();

    assert_eq!("GET /trigger/evt/with/key/K?value1=1&value2=2&value3=3", request.text());
    assert_eq!(56, request.send_length());
    assert_eq!(&WEBHOOK_ENDPOINT, request.endpoint());
    assert!(request.closes_socket());
    assert!(!request.requires_ssl_buffer());
}

#[test]
fn test_webhook_request_single_value() {
    let request = UploadRequest::webhook("K", "door_open", &[0.5]).unwrap();
    assert_eq!("GET /trigger/door_open/with/key/K?value1=0.5", request.text());
}

#[test]
fn test_webhook_request_without_values() {
    let request = UploadRequest::webhook("K", "evt", &[]).unwrap();
    assert_eq!("GET /trigger/evt/with/key/K", request.text());
}

#[test]
fn test_webhook_request_too_many_values() {
    let error = UploadRequest::webhook("K", "evt", &[1.0, 2.0, 3.0, 4.0]).unwrap_err();
    assert_eq!(RequestError::TooManyValues, error);
}

#[test]
fn test_form_request() {
    let request = UploadRequest::form("A", [("1", "x"), ("2", "y")]).unwrap();

    assert_eq!(
        "GET /forms/d/e/A/formResponse?entry.1=x&entry.2=y&submit=Submit HTTP/1.1\r\n\
         Host: docs.google.com\r\n\
         Connection: close\r\n\r\n\r\n\r\n",
        request.text()
    );
    assert_eq!(124, request.send_length());
    assert_eq!(&FORMS_ENDPOINT, request.endpoint());
    assert!(request.closes_socket());
    assert!(request.requires_ssl_buffer());
}

#[test]
fn test_request_too_long() {
    let api_key: String = "k".repeat(REQUEST_CAPACITY);
    let error = UploadRequest::metrics(&api_key, &[1.0]).unwrap_err();

    assert_eq!(RequestError::TooLong, error);
}

#[test]
fn test_endpoints() {
    assert_eq!("api.thingspeak.com", METRICS_ENDPOINT.host);
    assert_eq!(80, METRICS_ENDPOINT.port);
    assert_eq!(Security::Tcp, METRICS_ENDPOINT.security);

    assert_eq!("maker.ifttt.com", WEBHOOK_ENDPOINT.host);
    assert_eq!(80, WEBHOOK_ENDPOINT.port);
    assert_eq!(Security::Tcp, WEBHOOK_ENDPOINT.security);

    assert_eq!("docs.google.com", FORMS_ENDPOINT.host);
    assert_eq!(443, FORMS_ENDPOINT.port);
    assert_eq!(Security::Ssl, FORMS_ENDPOINT.security);
}
