//! Whole-record codec: record → CBOR → base64 text, and back.

use base64ct::{Base64, Encoding};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RecordCodecError;
use crate::types::{Database, Function, Index, Partition, Table};

mod sealed {
    pub trait Sealed {}
}

/// A catalog record that can be embedded in a change event.
///
/// Sealed: only the record types of this crate are embeddable.
pub trait CatalogObject: Serialize + DeserializeOwned + sealed::Sealed {
    /// Short record name used in diagnostics.
    const RECORD_TYPE: &'static str;
}

macro_rules! catalog_object {
    ($($ty:ident => $name:literal),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl CatalogObject for $ty {
                const RECORD_TYPE: &'static str = $name;
            }
        )*
    };
}

catalog_object! {
    Database => "database",
    Table => "table",
    Partition => "partition",
    Function => "function",
    Index => "index",
}

/// Encode a whole record as base64-wrapped CBOR text.
pub fn encode_record<T: CatalogObject>(record: &T) -> Result<String, RecordCodecError> {
    let mut buf = Vec::new();
    ciborium::into_writer(record, &mut buf)
        .map_err(|e| RecordCodecError::Encode(format!("{}", e)))?;
    let text = Base64::encode_string(&buf);
    tracing::trace!(record = T::RECORD_TYPE, len = text.len(), "encoded record");
    Ok(text)
}

/// Decode record text produced by [`encode_record`].
///
/// Every call returns a freshly built value; nothing is shared between calls.
pub fn decode_record<T: CatalogObject>(text: &str) -> Result<T, RecordCodecError> {
    let bytes =
        Base64::decode_vec(text).map_err(|e| RecordCodecError::InvalidBase64(e.to_string()))?;
    let mut rest = bytes.as_slice();
    let record = ciborium::from_reader(&mut rest)
        .map_err(|e| RecordCodecError::Decode(format!("{}", e)))?;
    if !rest.is_empty() {
        return Err(RecordCodecError::Decode(format!(
            "{} trailing bytes after record",
            rest.len()
        )));
    }
    tracing::trace!(record = T::RECORD_TYPE, len = text.len(), "decoded record");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        FieldSchema, Order, PrincipalType, ResourceType, ResourceUri, SerDeInfo, SkewedInfo,
        StorageDescriptor,
    };

    fn sample_table() -> Table {
        let mut table = Table::new("sales", "orders");
        table.owner = Some("etl".to_string());
        table.create_time = 1_700_000_000;
        table.table_type = Some("MANAGED_TABLE".to_string());
        table.partition_keys = vec![FieldSchema::new("ds", "string")];
        table.parameters.insert("transient_lastDdlTime".into(), "1700000000".into());
        table.sd = StorageDescriptor {
            cols: vec![
                FieldSchema::new("id", "bigint"),
                FieldSchema {
                    name: "amount".to_string(),
                    type_name: "decimal(10,2)".to_string(),
                    comment: Some("gross".to_string()),
                },
            ],
            location: Some("hdfs://nn/warehouse/sales.db/orders".to_string()),
            input_format: Some("org.apache.hadoop.mapred.TextInputFormat".to_string()),
            num_buckets: 4,
            bucket_cols: vec!["id".to_string()],
            sort_cols: vec![Order {
                col: "id".to_string(),
                order: 1,
            }],
            serde_info: SerDeInfo {
                name: None,
                serialization_lib: Some("LazySimpleSerDe".to_string()),
                parameters: [("field.delim".to_string(), ",".to_string())].into(),
            },
            skewed_info: Some(SkewedInfo {
                skewed_col_names: vec!["id".to_string()],
                skewed_col_values: vec![vec!["1".to_string()]],
                skewed_col_value_location_maps: [("1".to_string(), "/skew/1".to_string())]
                    .into(),
            }),
            ..Default::default()
        };
        table
    }

    #[test]
    fn table_round_trip() {
        let table = sample_table();
        let text = encode_record(&table).unwrap();
        let decoded: Table = decode_record(&text).unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn function_round_trip_keeps_resources() {
        let mut f = Function::new("default", "to_upper", "com.example.ToUpper");
        f.owner_name = Some("admin".to_string());
        f.owner_type = Some(PrincipalType::Role);
        f.resource_uris = vec![ResourceUri {
            resource_type: ResourceType::Jar,
            uri: "hdfs://nn/udfs/upper.jar".to_string(),
        }];
        let decoded: Function = decode_record(&encode_record(&f).unwrap()).unwrap();
        assert_eq!(decoded, f);
    }

    #[test]
    fn encoding_is_text_safe() {
        let text = encode_record(&sample_table()).unwrap();
        assert!(text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='));
    }

    #[test]
    fn identical_records_encode_identically() {
        let a = encode_record(&sample_table()).unwrap();
        let b = encode_record(&sample_table()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = decode_record::<Table>("not base64!!").unwrap_err();
        assert!(matches!(err, RecordCodecError::InvalidBase64(_)));
    }

    #[test]
    fn rejects_invalid_cbor() {
        let text = Base64::encode_string(&[0xff, 0xff]);
        let err = decode_record::<Table>(&text).unwrap_err();
        assert!(matches!(err, RecordCodecError::Decode(_)));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut buf = Vec::new();
        ciborium::into_writer(&Table::new("db", "t"), &mut buf).unwrap();
        buf.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let text = Base64::encode_string(&buf);
        let err = decode_record::<Table>(&text).unwrap_err();
        assert!(matches!(err, RecordCodecError::Decode(ref m) if m.contains("4 trailing bytes")));
    }

    #[test]
    fn rejects_wrong_record_type() {
        let text = encode_record(&Partition::new("db", "t", ["a"])).unwrap();
        assert!(decode_record::<Function>(&text).is_err());
    }
}
