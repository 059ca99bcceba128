/// mydumper metadata 파일을 읽어 binlog 위치와 GTID를 출력합니다.
///
/// 사용법: mydumper_meta <metadata 경로>
/// 환경 변수: MYDUMPER_META_PATH, MYDUMPER_META_TIMEOUT_SECS, MYDUMPER_META_OUTPUT (json|text)
use mydumper_meta::{parse_metadata_async, CliConfig, DumpMetadata, MetaError, OutputFormat};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 로깅 초기화
    tracing_subscriber::fmt::init();

    let config = CliConfig::from_env()?;
    info!("Reading mydumper metadata from {}", config.path.display());

    let meta = tokio::time::timeout(config.timeout, parse_metadata_async(config.path.clone()))
        .await
        .map_err(|_| MetaError::Timeout)??;

    println!("{}", render(&meta, config.output)?);
    Ok(())
}

fn render(meta: &DumpMetadata, output: OutputFormat) -> Result<String, MetaError> {
    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&meta.to_json())?),
        OutputFormat::Text => {
            let position = meta
                .position
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            Ok(format!("{}\n{}", position, meta.gtid.as_deref().unwrap_or_default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mydumper_meta::BinlogPosition;

    #[test]
    fn test_render_text() {
        let meta = DumpMetadata {
            position: Some(BinlogPosition::new("mysql-bin.000002", 100)),
            gtid: Some("3E11FA47-71CA-11E1-9E33-C80AA9429562:1-5".to_string()),
            ..Default::default()
        };
        assert_eq!(
            render(&meta, OutputFormat::Text).unwrap(),
            "mysql-bin.000002:100\n3E11FA47-71CA-11E1-9E33-C80AA9429562:1-5"
        );
    }

    #[test]
    fn test_render_json_empty() {
        let out = render(&DumpMetadata::default(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["file"].is_null());
        assert!(value["gtid"].is_null());
    }
}
