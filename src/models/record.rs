use serde::{Deserialize, Serialize};

/// One structured access-log entry, exactly as written by the origin server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Opaque timestamp string, carried through untouched
    pub timestamp: String,
    pub req: RequestInfo,
    pub rsp: ResponseInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub method: String,
    /// Path plus query string, e.g. `/balance?user_id=42`
    pub url: String,
    pub qs_params: String,
    /// Raw header blob, not parsed
    pub headers: String,
    pub req_body_len: i64,
    /// User id recorded by the origin system (not verified)
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInfo {
    pub status_code: i64,
    pub status_class: String,
    pub rsp_body_len: i64,
}

/// A record paired with the 1-based line it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedRecord {
    pub line: usize,
    pub record: LogRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE: &str = r#"{"timestamp":"t","req":{"method":"GET","url":"/balance?user_id=42","qs_params":"","headers":"","req_body_len":0,"user_id":7},"rsp":{"status_code":403,"status_class":"4xx","rsp_body_len":0}}"#;

    #[test]
    fn test_decode_wire_shape() {
        let record: LogRecord = serde_json::from_str(WIRE).unwrap();
        assert_eq!(record.timestamp, "t");
        assert_eq!(record.req.method, "GET");
        assert_eq!(record.req.url, "/balance?user_id=42");
        assert_eq!(record.req.user_id, 7);
        assert_eq!(record.rsp.status_code, 403);
        assert_eq!(record.rsp.status_class, "4xx");
    }

    #[test]
    fn test_missing_field_is_rejected() {
        // rsp_body_len omitted
        let line = r#"{"timestamp":"t","req":{"method":"GET","url":"/","qs_params":"","headers":"","req_body_len":0,"user_id":7},"rsp":{"status_code":200,"status_class":"2xx"}}"#;
        assert!(serde_json::from_str::<LogRecord>(line).is_err());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let line = WIRE.replace(r#""user_id":7"#, r#""user_id":"7""#);
        assert!(serde_json::from_str::<LogRecord>(&line).is_err());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let line = WIRE.replace(r#""timestamp":"t","#, r#""timestamp":"t","host":"api-1","#);
        let record: LogRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(record.req.user_id, 7);
    }

    #[test]
    fn test_negative_and_wide_integers() {
        let line = WIRE
            .replace(r#""req_body_len":0"#, r#""req_body_len":-1"#)
            .replace(r#""status_code":403"#, r#""status_code":70000"#)
            .replace(r#""rsp_body_len":0"#, r#""rsp_body_len":-5"#);
        let record: LogRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(record.req.req_body_len, -1);
        assert_eq!(record.rsp.status_code, 70000);
        assert_eq!(record.rsp.rsp_body_len, -5);
    }
}
