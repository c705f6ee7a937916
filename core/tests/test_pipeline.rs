// Parallel decode pipeline
//
// * ✅ one worker preserves stream order
// * ✅ several workers yield a permutation of the input frames
// * ✅ ordered collection re-sequences pool output
// * ❌ a bad frame reaches the consumer as an error and the pipeline winds down

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::thread;

    use crossbeam::channel::unbounded;

    use acmi_core::stream::frame_worker::{DecodedFrame, FrameWorkerError};
    use acmi_core::stream::framing::{FrameError, TimeFrame};
    use acmi_core::stream::parallelism::ParallelismProfile;
    use acmi_core::stream::pipeline::{PipelineConfig, run_decode_pipeline};
    use acmi_core::stream::OrderedFrameCollector;
    use acmi_core::telemetry::TelemetrySnapshot;
    use acmi_core::types::StreamError;

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------
    fn body(frames: usize) -> Vec<u8> {
        let mut out = String::new();
        for i in 0..frames {
            out.push_str(&format!("#{i}\n{:x},Name=obj{i},T=1|2|{i}\n", i + 1));
            if i % 3 == 0 {
                out.push_str(&format!("-{:x}\n", i + 100));
            }
        }
        out.into_bytes()
    }

    fn run(
        input: Vec<u8>,
        profile: ParallelismProfile,
    ) -> (Vec<Result<DecodedFrame, FrameWorkerError>>, Result<TelemetrySnapshot, StreamError>) {
        let (tx, rx) = unbounded();
        let config = PipelineConfig::new(profile);

        let producer = thread::spawn(move || run_decode_pipeline(Cursor::new(input), &config, tx));
        let results: Vec<_> = rx.iter().collect();
        let snapshot = producer.join().unwrap();
        (results, snapshot)
    }

    fn offsets(frames: &[TimeFrame]) -> Vec<f64> {
        frames.iter().map(|f| f.offset).collect()
    }

// # ✅ 1. Single worker keeps order

    #[test]
    fn single_worker_preserves_order() {
        let (results, snapshot) = run(body(50), ParallelismProfile::single_threaded());
        let frames: Vec<TimeFrame> = results.into_iter().map(|r| r.unwrap().frame).collect();

        let expected: Vec<f64> = (0..50).map(|i| i as f64).collect();
        assert_eq!(offsets(&frames), expected);

        let snapshot = snapshot.unwrap();
        assert_eq!(snapshot.counters.segments, 50);
        assert_eq!(snapshot.counters.bytes_read, body(50).len() as u64);
    }

// # ✅ 2. Many workers yield a permutation

    #[test]
    fn many_workers_yield_permutation() {
        let (results, snapshot) = run(body(200), ParallelismProfile::new(8, 4));
        assert!(snapshot.is_ok());

        let mut indices: Vec<u64> = results.iter().map(|r| r.as_ref().unwrap().segment_index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..200).collect::<Vec<u64>>());

        for decoded in results.iter().map(|r| r.as_ref().unwrap()) {
            assert_eq!(decoded.frame.offset, decoded.segment_index as f64);
            assert_eq!(decoded.telemetry.frames_decoded, 1);
        }
    }

    #[test]
    fn ordered_collector_restores_stream_order() {
        let (results, _) = run(body(120), ParallelismProfile::new(6, 2));

        let mut collector = OrderedFrameCollector::new();
        for decoded in results {
            collector.push(decoded.unwrap());
        }
        assert_eq!(collector.pending(), 0);

        let frames = collector.finish().unwrap();
        let expected: Vec<f64> = (0..120).map(|i| i as f64).collect();
        assert_eq!(offsets(&frames), expected);
    }

    #[test]
    fn empty_body_produces_nothing() {
        let (results, snapshot) = run(Vec::new(), ParallelismProfile::new(4, 4));
        assert!(results.is_empty());
        assert_eq!(snapshot.unwrap().counters.segments, 0);
    }

// # ❌ 3. Error propagation

    #[test]
    fn bad_frame_is_reported_with_its_index() {
        let mut input = body(5);
        input.extend_from_slice(b"#5\nnot an object line\n");
        input.extend_from_slice(&body(3));

        let (results, _) = run(input, ParallelismProfile::single_threaded());

        let err = results.into_iter().find_map(|r| r.err()).expect("an error");
        let FrameWorkerError::Decode { segment_index, source } = err;
        assert_eq!(segment_index, 5);
        assert!(matches!(source, FrameError::MalformedLine(_)));
    }

    #[test]
    fn consumer_stopping_early_winds_down_pool() {
        let mut input = b"#0\nbroken\n".to_vec();
        input.extend_from_slice(&body(500));

        let (tx, rx) = crossbeam::channel::bounded(1);
        let config = PipelineConfig::new(ParallelismProfile::new(4, 1));
        let producer = thread::spawn(move || run_decode_pipeline(Cursor::new(input), &config, tx));

        // stop at the first error
        let first_err = rx.iter().find_map(|r| r.err());
        assert!(first_err.is_some());
        drop(rx);

        // must not hang; a closed channel surfaces as a pipeline error or a clean end
        let outcome = producer.join().unwrap();
        if let Err(e) = outcome {
            assert!(matches!(e, StreamError::PipelineError(_)));
        }
    }
}
