//! Unit tests for pq-input.

#[cfg(test)]
mod message_tests {
    use crate::{ArrivalRequest, InputError, parse_line};

    #[test]
    fn parses_request_with_timestamp() {
        let req = parse_line("SERVICE_REQUEST,passports,123456\n").unwrap().unwrap();
        assert_eq!(
            req,
            ArrivalRequest {
                category:         "passports".into(),
                device_timestamp: Some("123456".into()),
            }
        );
    }

    #[test]
    fn timestamp_is_optional() {
        let req = parse_line(" SERVICE_REQUEST , parcels ").unwrap().unwrap();
        assert_eq!(req.category, "parcels");
        assert_eq!(req.device_timestamp, None);
        let req = parse_line("SERVICE_REQUEST,parcels,").unwrap().unwrap();
        assert_eq!(req.device_timestamp, None);
    }

    #[test]
    fn blank_lines_carry_nothing() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   \r\n").unwrap().is_none());
    }

    #[test]
    fn malformed_lines_rejected() {
        for line in ["HELLO", "SERVICE_REQUEST", "SERVICE_REQUEST,", "service_request,parcels"] {
            assert!(matches!(parse_line(line), Err(InputError::Malformed(_))), "{line}");
        }
    }

    #[test]
    fn unknown_category_is_not_a_parse_error() {
        let req = parse_line("SERVICE_REQUEST,lottery,1").unwrap().unwrap();
        assert_eq!(req.category, "lottery");
    }
}

#[cfg(test)]
mod feed_tests {
    use std::io::{self, BufReader, Cursor, Read};
    use std::thread;
    use std::time::Duration;

    use pq_core::SimConfig;
    use pq_sim::QueueSim;

    use crate::{ArrivalFeed, DrainReport};

    /// Drain until the reader has finished and every message is applied.
    fn drain_all(feed: &mut ArrivalFeed, sim: &mut QueueSim) -> DrainReport {
        let mut total = DrainReport::default();
        for _ in 0..5_000 {
            total += feed.drain_into(sim);
            if feed.is_closed() {
                return total;
            }
            thread::sleep(Duration::from_millis(1));
        }
        panic!("arrival feed never closed");
    }

    #[test]
    fn feed_adds_customers_in_order() {
        let input = "SERVICE_REQUEST,standard_post,1\n\
                     \n\
                     SERVICE_REQUEST,parcels,2\n\
                     SERVICE_REQUEST,passports,3\n";
        let mut sim = QueueSim::new(SimConfig::default()).unwrap();
        let mut feed = ArrivalFeed::spawn(Cursor::new(input));

        let report = drain_all(&mut feed, &mut sim);
        assert_eq!(report, DrainReport { accepted: 3, rejected: 0, malformed: 0, read_errors: 0 });
        assert_eq!(
            sim.queue_lengths(),
            vec![("standard_post", 1), ("passports", 1), ("parcels", 1)]
        );
        let ids: Vec<u64> = sim.queues().waiting().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn bad_lines_are_counted_not_fatal() {
        let input = "SERVICE_REQUEST,lottery,1\nGARBAGE\nSERVICE_REQUEST,parcels,2\n";
        let mut sim = QueueSim::new(SimConfig::default()).unwrap();
        let mut feed = ArrivalFeed::spawn(Cursor::new(input));

        let report = drain_all(&mut feed, &mut sim);
        assert_eq!(report, DrainReport { accepted: 1, rejected: 1, malformed: 1, read_errors: 0 });
        assert_eq!(sim.statistics().total_customers, 1);
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let input: &[u8] = b"SERVICE_REQUEST,passports\n\xff\xfe garbled\nSERVICE_REQUEST,parcels\nSERVICE_REQUEST,standard_post\n";
        let mut sim = QueueSim::new(SimConfig::default()).unwrap();
        let mut feed = ArrivalFeed::spawn(Cursor::new(input.to_vec()));

        let report = drain_all(&mut feed, &mut sim);
        assert_eq!(report, DrainReport { accepted: 3, rejected: 0, malformed: 1, read_errors: 0 });
        assert_eq!(sim.statistics().waiting, 3);
    }

    /// Yields `data`, then fails every read.
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn read_error_is_counted_apart_from_bad_lines() {
        let reader = FailingReader { data: Cursor::new(b"SERVICE_REQUEST,parcels\nNOPE\n".to_vec()) };
        let mut sim = QueueSim::new(SimConfig::default()).unwrap();
        let mut feed = ArrivalFeed::spawn(BufReader::new(reader));

        let report = drain_all(&mut feed, &mut sim);
        assert_eq!(report, DrainReport { accepted: 1, rejected: 0, malformed: 1, read_errors: 1 });
    }

    #[test]
    fn closed_feed_stays_closed() {
        let mut sim = QueueSim::new(SimConfig::default()).unwrap();
        let mut feed = ArrivalFeed::spawn(Cursor::new(""));
        drain_all(&mut feed, &mut sim);
        assert!(feed.try_next().is_none());
        assert_eq!(feed.drain_into(&mut sim), DrainReport::default());
    }
}
