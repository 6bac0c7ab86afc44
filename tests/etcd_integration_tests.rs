// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the etcd store using Docker containers.

mod common;

#[cfg(feature = "etcd")]
mod etcd_tests {
    use kvdoc::adapters::EtcdStore;
    use kvdoc::domain::{BatchOptions, CallContext, ConfigError, ConfigPair, NestedDocument};
    use kvdoc::ports::KvStore;
    use kvdoc::service::{write_batch, DocumentService};
    use testcontainers::{core::WaitFor, runners::AsyncRunner, GenericImage, ImageExt};

    use crate::common as docker_helpers;

    /// Starts an etcd container and connects a store to it.
    async fn setup_etcd_test() -> Option<(testcontainers::ContainerAsync<GenericImage>, EtcdStore)>
    {
        if !docker_helpers::is_docker_available() {
            docker_helpers::print_docker_unavailable_warning("etcd integration test");
            return None;
        }

        let etcd_image = GenericImage::new("quay.io/coreos/etcd", "v3.5.0")
            .with_exposed_port(2379.into())
            .with_wait_for(WaitFor::message_on_stderr("ready to serve client requests"))
            .with_env_var("ETCD_ADVERTISE_CLIENT_URLS", "http://0.0.0.0:2379")
            .with_env_var("ETCD_LISTEN_CLIENT_URLS", "http://0.0.0.0:2379");

        let container = etcd_image.start().await.ok()?;
        let port = container.get_host_port_ipv4(2379).await.ok()?;
        let endpoint = format!("127.0.0.1:{}", port);

        // Give etcd a moment to fully start
        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;

        let store = EtcdStore::connect(vec![endpoint]).await.ok()?;
        Some((container, store))
    }

    fn pairs(n: usize) -> Vec<ConfigPair> {
        (1..=n)
            .map(|i| ConfigPair::new(format!("/load/key{:04}", i), i.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_etcd_commit_and_list() {
        let Some((_container, store)) = setup_etcd_test().await else {
            return;
        };
        let ctx = CallContext::new();

        let applied = store.commit(&ctx, &pairs(3)).await.unwrap();
        assert!(applied);

        let listed = store.list(&ctx, "/load/").await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0], ConfigPair::new("/load/key0001", "1"));
    }

    #[tokio::test]
    async fn test_etcd_rejects_oversized_transaction() {
        let Some((_container, store)) = setup_etcd_test().await else {
            return;
        };

        let err = store
            .commit(&CallContext::new(), &pairs(129))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::StoreError { .. }));
    }

    #[tokio::test]
    async fn test_etcd_batch_write_300_keys() {
        let Some((_container, store)) = setup_etcd_test().await else {
            return;
        };
        let ctx = CallContext::new();

        let result = write_batch(&store, &ctx, &pairs(300), None, &BatchOptions::default())
            .await
            .unwrap();
        assert_eq!(result.succeeded, 300);
        assert_eq!(result.retry_count, 0);

        let listed = store.list(&ctx, "/load/").await.unwrap();
        assert_eq!(listed.len(), 300);
    }

    #[tokio::test]
    async fn test_etcd_document_round_trip() {
        let Some((_container, store)) = setup_etcd_test().await else {
            return;
        };
        let service = DocumentService::builder(store)
            .with_prefix("/apps/web")
            .build()
            .unwrap();
        let ctx = CallContext::new();
        let doc = NestedDocument::from_json_str(
            r#"{"server": {"port": 8080, "hosts": ["a", "b"]}, "name": "web"}"#,
        )
        .unwrap();

        service.push(&ctx, &doc, None).await.unwrap();
        let pulled = service.pull(&ctx).await.unwrap();

        assert_eq!(pulled.get("server/port").and_then(|v| v.as_str()), Some("8080"));
        assert_eq!(
            pulled.get("server/hosts").and_then(|v| v.as_str()),
            Some(r#"["a","b"]"#)
        );
        assert_eq!(pulled.get("name").and_then(|v| v.as_str()), Some("web"));
    }
}
