use glint_com::framing::{read_message, write_message};
use glint_com::{ComError, MAX_MESSAGE_SIZE};
use tokio::io::AsyncWriteExt;

#[tokio::test]
async fn test_messages_arrive_in_order() {
    let (mut a, mut b) = tokio::io::duplex(1024);

    write_message(&mut a, &7u32).await.unwrap();
    write_message(&mut a, &"edge".to_string()).await.unwrap();

    assert_eq!(read_message::<u32, _>(&mut b).await.unwrap(), 7);
    assert_eq!(read_message::<String, _>(&mut b).await.unwrap(), "edge");
}

#[tokio::test]
async fn test_length_prefix_is_little_endian() {
    let (mut a, mut b) = tokio::io::duplex(64);
    write_message(&mut a, &0x0102_0304u32).await.unwrap();
    drop(a);

    let mut raw = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut b, &mut raw)
        .await
        .unwrap();
    assert_eq!(raw, vec![4, 0, 0, 0, 4, 3, 2, 1]);
}

#[tokio::test]
async fn test_clean_close_is_connection_closed() {
    let (a, mut b) = tokio::io::duplex(64);
    drop(a);
    assert!(matches!(
        read_message::<u32, _>(&mut b).await,
        Err(ComError::ConnectionClosed)
    ));
}

#[tokio::test]
async fn test_truncated_body_is_connection_closed() {
    let (mut a, mut b) = tokio::io::duplex(64);
    a.write_all(&[8, 0, 0, 0, 1, 2]).await.unwrap();
    drop(a);
    assert!(matches!(
        read_message::<u64, _>(&mut b).await,
        Err(ComError::ConnectionClosed)
    ));
}

#[tokio::test]
async fn test_oversized_prefix_rejected() {
    let (mut a, mut b) = tokio::io::duplex(64);
    a.write_all(&(MAX_MESSAGE_SIZE + 1).to_le_bytes())
        .await
        .unwrap();
    match read_message::<u32, _>(&mut b).await {
        Err(ComError::MessageTooLarge(len)) => assert_eq!(len, MAX_MESSAGE_SIZE + 1),
        other => panic!("expected MessageTooLarge, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_bad_body_is_decode_error() {
    let (mut a, mut b) = tokio::io::duplex(64);
    // bool with value 2
    a.write_all(&[1, 0, 0, 0, 2]).await.unwrap();
    assert!(matches!(
        read_message::<bool, _>(&mut b).await,
        Err(ComError::Decode(_))
    ));
}
