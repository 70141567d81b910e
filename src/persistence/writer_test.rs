#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use crate::persistence::{DiskWriter, PersistError};

    #[tokio::test]
    async fn test_save_uses_sanitized_name_and_exact_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = DiskWriter::open(tmp.path()).await.unwrap();
        let payload = Bytes::from_static(b"<html>\x00\xffbinary-safe</html>");

        let path = writer.save(&payload, "http://a.com/x:y").await.unwrap();

        assert_eq!(path, tmp.path().join("http^__a.com_x^y.html"));
        assert_eq!(std::fs::read(&path).unwrap(), payload.to_vec());
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = DiskWriter::open(tmp.path()).await.unwrap();

        writer.save(&Bytes::from_static(b"first version, longer"), "http://a.com/").await.unwrap();
        let path = writer.save(&Bytes::from_static(b"second"), "http://a.com/").await.unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_open_is_idempotent_and_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("cache");

        DiskWriter::open(&dir).await.unwrap();
        let writer = DiskWriter::open(&dir).await.unwrap();

        assert!(dir.is_dir());
        assert_eq!(writer.dir(), dir.as_path());
    }

    #[tokio::test]
    async fn test_open_fails_when_path_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("taken");
        std::fs::write(&file, b"x").unwrap();

        let err = DiskWriter::open(&file).await.unwrap_err();
        assert!(matches!(err, PersistError::CreateDir { .. }));
    }

    #[tokio::test]
    async fn test_save_reports_write_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = DiskWriter::open(tmp.path()).await.unwrap();
        std::fs::remove_dir(tmp.path()).unwrap();

        let err = writer
            .save(&Bytes::from_static(b"x"), "http://a.com/")
            .await
            .unwrap_err();
        assert!(matches!(err, PersistError::Write { .. }));
    }
}
