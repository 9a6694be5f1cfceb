use logferry::adapter::{FileSink, RemoteSink};
use logferry::app::router::router;
use logferry::app::state::SubmitState;
use logferry::config::InboundPolicy;
use logferry::domain::{Formatter, Record};
use logferry::error::RelayError;
use logferry::pipeline::{InFlight, delivery_channel, writer};
use logferry::port::RecordSink;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// A full receiving node: listener + delivery queue + writer appending to a
/// file, the same wiring `app::run` performs.
struct ReceiverNode {
    addr: SocketAddr,
    logfile: PathBuf,
    inflight: Arc<InFlight>,
    server: JoinHandle<()>,
    _tmp: TempDir,
}

impl ReceiverNode {
    async fn spawn() -> Self {
        let tmp = TempDir::new().unwrap();
        let logfile = tmp.path().join("peer.log");

        let inflight = Arc::new(InFlight::new());
        let (producer, consumer) = delivery_channel(64, inflight.clone()).unwrap();
        let sink: Arc<dyn RecordSink> = Arc::new(FileSink::open(&logfile).await.unwrap());
        tokio::spawn(writer::run(consumer, sink, inflight.clone()));

        let state = SubmitState {
            queue: producer,
            formatter: Arc::new(Formatter::new("", false)),
            policy: InboundPolicy::Verbatim,
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        Self {
            addr,
            logfile,
            inflight,
            server,
            _tmp: tmp,
        }
    }

    fn endpoint(&self) -> Url {
        format!("http://{}", self.addr).parse().unwrap()
    }

    fn stop(&self) {
        self.server.abort();
    }
}

// A forwarding writer delivers to the peer; the peer's writer persists.
// The sender's call only completes once the peer has queued the record.
#[tokio::test]
async fn forwarded_records_land_in_the_peer_file() {
    let receiver = ReceiverNode::spawn().await;

    let sink: Arc<dyn RecordSink> = Arc::new(RemoteSink::connect(&receiver.endpoint()).await.unwrap());
    let inflight = Arc::new(InFlight::new());
    let (producer, consumer) = delivery_channel(64, inflight.clone()).unwrap();
    let forwarder = tokio::spawn(writer::run(consumer, sink, inflight.clone()));

    // The sender tags records; the receiver stores them verbatim.
    let formatter = Formatter::new("n1", false);
    producer.submit(formatter.format("hello")).await.unwrap();
    producer.submit(Record::new("x")).await.unwrap();
    drop(producer);

    tokio::time::timeout(Duration::from_secs(5), forwarder)
        .await
        .expect("forwarding writer should finish")
        .unwrap()
        .unwrap();
    assert_eq!(inflight.value(), 0);

    // Every acknowledged record is in the peer's queue; wait for its writer.
    tokio::time::timeout(Duration::from_secs(5), receiver.inflight.wait_zero())
        .await
        .expect("peer should persist all records");

    let contents = std::fs::read_to_string(&receiver.logfile).unwrap();
    assert_eq!(contents, "n1: hello\nx\n");

    receiver.stop();
}

#[tokio::test]
async fn unreachable_peer_is_fatal_at_startup() {
    // Grab a free port, then close it again before dialing.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint: Url = format!("http://{addr}").parse().unwrap();
    let err = RemoteSink::connect(&endpoint).await.unwrap_err();
    assert!(matches!(err, RelayError::Dial { .. }), "got: {err}");
}

// Scenario: peer goes away after the connection was established. The next
// forwarded record fails the writer and the record stays counted in flight.
#[tokio::test]
async fn peer_death_mid_stream_fails_the_writer_and_leaves_records_in_flight() {
    let receiver = ReceiverNode::spawn().await;
    let sink: Arc<dyn RecordSink> = Arc::new(RemoteSink::connect(&receiver.endpoint()).await.unwrap());

    sink.deliver(&Record::new("delivered before the crash"))
        .await
        .unwrap();

    receiver.stop();
    let _ = receiver.server.await;

    let inflight = Arc::new(InFlight::new());
    let (producer, consumer) = delivery_channel(8, inflight.clone()).unwrap();
    let forwarder = tokio::spawn(writer::run(consumer, sink, inflight.clone()));

    producer.submit(Record::new("stranded")).await.unwrap();
    drop(producer);

    let result = tokio::time::timeout(Duration::from_secs(30), forwarder)
        .await
        .expect("writer should fail fast")
        .unwrap();
    assert!(result.is_err());
    assert_eq!(inflight.value(), 1);
}
