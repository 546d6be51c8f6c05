//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 配置文件到 Reporting 的完整加载链路
//! - 真实 HTTP 客户端 + mockito 服务端的投递测试
//! - 多个 Reporting 实例共享角色文件流

#[cfg(test)]
mod contract_tests {
    use contracts::{DeploymentType, ReportingConfig};

    #[test]
    fn test_camel_case_config_shape() {
        let raw = r#"{
            "host": "h1",
            "cluster": "c1",
            "mbaasType": "openshift",
            "realTimeLoggingEnabled": true,
            "msgServer": { "logMessageURL": "http://x/TOPIC" },
            "recoveryFiles": { "fileName": "/tmp/r-TOPIC.log" }
        }"#;

        let config = config_loader::ConfigLoader::load_from_str(
            raw,
            config_loader::ConfigFormat::Json,
        )
        .unwrap();
        assert_eq!(config.mbaas_type, DeploymentType::OpenShift);
        assert_eq!(
            config.recovery_template().unwrap().expand("events"),
            "/tmp/r-events.log"
        );
        assert_eq!(
            config,
            ReportingConfig::new("h1", "c1")
                .with_deployment(DeploymentType::OpenShift)
                .with_real_time_logging(true)
                .with_log_message_url("http://x/TOPIC")
                .with_recovery_file("/tmp/r-TOPIC.log")
        );
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::path::Path;
    use std::time::Duration;

    use contracts::{ContractError, DeploymentType, Destination, FileRecord, Message, OutcomeStatus};
    use dispatcher::{
        create_reporting, identity, HttpClient, HttpClientConfig, LogCollaborator, Reporting,
        ReportingBuilder, StreamRegistry,
    };
    use mockito::{Matcher, Server};
    use serde_json::json;
    use tempfile::tempdir;

    fn openshift(url: &str) -> contracts::ReportingConfig {
        contracts::ReportingConfig::new("h1", "c1")
            .with_deployment(DeploymentType::OpenShift)
            .with_real_time_logging(true)
            .with_log_message_url(url)
    }

    fn reporting(
        config: contracts::ReportingConfig,
        registry: StreamRegistry,
    ) -> Reporting<LogCollaborator, HttpClient> {
        let transport = HttpClient::new(HttpClientConfig {
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        ReportingBuilder::new(config, LogCollaborator::new("test"), transport)
            .registry(registry)
            .build()
            .unwrap()
    }

    fn message(value: serde_json::Value) -> Message {
        value.as_object().cloned().unwrap()
    }

    fn read_records(path: &Path) -> Vec<FileRecord> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    /// URL template pointing at a port nothing listens on
    fn unreachable_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/TOPIC")
    }

    /// openshift + unreachable message server + recovery file:
    /// the message ends up in `r-events.log`
    #[tokio::test]
    async fn test_network_failure_lands_in_recovery_file() {
        let dir = tempdir().unwrap();
        let recovery = format!("{}/r-TOPIC.log", dir.path().display());
        let config = openshift(&unreachable_url()).with_recovery_file(&recovery);
        let reporting = reporting(config, StreamRegistry::new());

        let mut msg = message(json!({ "a": 1 }));
        let report = reporting.log_message("events", &mut msg).await;

        assert!(matches!(report.error, Some(ContractError::Transport { .. })));
        assert_eq!(
            report.outcome(Destination::Http).unwrap().status,
            OutcomeStatus::Ok
        );

        let records = read_records(&dir.path().join("r-events.log"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "events");
        assert_eq!(records[0].message["a"], 1);
        assert_eq!(records[0].message["_ho"], "h1");
        assert_eq!(records[0].hash, identity::content_hash(&msg).unwrap());
    }

    #[tokio::test]
    async fn test_message_server_receives_stamped_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/log/events")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({ "a": 1, "_ho": "h1", "_cl": "c1" })))
            .with_status(200)
            .with_body("stored")
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let recovery = format!("{}/r-TOPIC.log", dir.path().display());
        let url = format!("{}/log/TOPIC", server.url());
        let reporting = reporting(
            openshift(&url).with_recovery_file(&recovery),
            StreamRegistry::new(),
        );

        let report = reporting
            .log_message("events", &mut message(json!({ "a": 1 })))
            .await;

        mock.assert_async().await;
        assert!(report.is_ok());
        let http = report.outcome(Destination::Http).unwrap();
        assert_eq!(http.info["statusCode"], 200);
        assert_eq!(http.info["body"], "stored");
        assert!(!dir.path().join("r-events.log").exists());
    }

    #[tokio::test]
    async fn test_server_error_is_recovered() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/log/events")
            .with_status(500)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let recovery = format!("{}/r-TOPIC.log", dir.path().display());
        let url = format!("{}/log/TOPIC", server.url());
        let reporting = reporting(
            openshift(&url).with_recovery_file(&recovery),
            StreamRegistry::new(),
        );

        let report = reporting
            .log_message("events", &mut message(json!({ "a": 1 })))
            .await;

        mock.assert_async().await;
        assert!(matches!(
            report.error,
            Some(ContractError::UnexpectedStatus { status: 500, .. })
        ));
        assert_eq!(read_records(&dir.path().join("r-events.log")).len(), 1);
    }

    #[tokio::test]
    async fn test_non_openshift_never_posts() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let url = format!("{}/log/TOPIC", server.url());
        let config = openshift(&url).with_deployment(DeploymentType::Other("feedhenry".into()));
        let reporting = reporting(config, StreamRegistry::new());

        let report = reporting
            .log_message("events", &mut message(json!({ "a": 1 })))
            .await;

        mock.assert_async().await;
        assert_eq!(
            report.outcome(Destination::Batching).unwrap().reason,
            "logged"
        );
        assert_eq!(reporting.collaborator().accepted(), 1);
    }

    #[tokio::test]
    async fn test_instances_share_role_streams() {
        let dir = tempdir().unwrap();
        let backup = dir.path().join("backup.log");
        let config = contracts::ReportingConfig::new("h1", "c1")
            .with_backup_file(backup.to_str().unwrap());

        let registry = StreamRegistry::new();
        let first = reporting(config.clone(), registry.clone());
        let second = reporting(config, registry.clone());

        let mut a = message(json!({ "from": "first" }));
        let mut b = message(json!({ "from": "second" }));
        tokio::join!(
            first.log_message("a", &mut a),
            second.log_message("b", &mut b),
        );
        registry.flush_all().await.unwrap();

        assert_eq!(registry.len(), 1);
        let mut topics: Vec<String> = read_records(&backup)
            .into_iter()
            .map(|r| r.topic)
            .collect();
        topics.sort();
        assert_eq!(topics, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_config_file_to_reporting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reporting.toml");
        let backup = dir.path().join("backup-TOPIC.log");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "host = \"h1\"\ncluster = \"c1\"\n\n[backupFiles]\nfileName = {:?}",
            backup.to_str().unwrap()
        )
        .unwrap();

        let config = config_loader::ConfigLoader::load_from_path(&path).unwrap();
        let reporting = create_reporting(config).unwrap();
        let report = reporting
            .log_message("audit", &mut message(json!({ "a": 1 })))
            .await;

        assert!(report.is_ok());
        assert_eq!(
            report.outcome(Destination::Batching).unwrap().reason,
            "disabled"
        );
        let records = read_records(&dir.path().join("backup-audit.log"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message["_cl"], "c1");
    }

    #[test]
    fn test_missing_identity_is_config_error() {
        let config = contracts::ReportingConfig {
            host: Some("h1".into()),
            ..Default::default()
        };
        assert!(create_reporting(config).err().unwrap().is_config());
    }
}
