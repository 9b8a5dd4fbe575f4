use noiez::RingBuffer;

#[test]
fn rejects_non_power_of_two_capacity() {
    assert!(RingBuffer::new(0).is_err());
    assert!(RingBuffer::new(6).is_err());
    assert!(RingBuffer::new(8_000).is_err());
    assert!(RingBuffer::new(1).is_ok());
    assert_eq!(RingBuffer::new(8_192).unwrap().capacity(), 8_192);
}

#[test]
fn round_trip_across_wrap_boundary() {
    let mut ring = RingBuffer::new(8).unwrap();
    let first = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let second = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0];

    assert_eq!(ring.write(&first), 6);
    let mut head = [0.0f32; 4];
    assert_eq!(ring.read(&mut head), 4);
    assert_eq!(head, [1.0, 2.0, 3.0, 4.0]);

    // Write cursor sits at 6, so this write wraps after two samples.
    assert_eq!(ring.write(&second), 6);
    assert!(ring.is_full());

    let mut rest = [0.0f32; 8];
    assert_eq!(ring.read(&mut rest), 8);
    assert_eq!(rest, [5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
    assert!(ring.is_empty());
}

#[test]
fn writes_truncate_to_free_space() {
    let mut ring = RingBuffer::new(8_192).unwrap();
    let samples: Vec<f32> = (0..9_000).map(|n| n as f32).collect();

    assert_eq!(ring.write(&samples), 8_192);
    assert_eq!(ring.available_read(), 8_192);
    assert_eq!(ring.available_write(), 0);
    assert_eq!(ring.write(&samples), 0);

    let mut out = vec![0.0f32; 9_000];
    assert_eq!(ring.read(&mut out), 8_192);
    assert_eq!(&out[..8_192], &samples[..8_192]);
}

#[test]
fn reads_truncate_to_queued_samples() {
    let mut ring = RingBuffer::new(16).unwrap();
    ring.write(&[0.5; 5]);
    let mut out = [0.0f32; 12];
    assert_eq!(ring.read(&mut out), 5);
    assert_eq!(ring.read(&mut out), 0);
    assert_eq!(&out[..5], &[0.5; 5]);
    assert_eq!(&out[5..], &[0.0; 7]);
}

#[test]
fn occupancy_tracks_writes_minus_reads() {
    let mut ring = RingBuffer::new(32).unwrap();
    let source: Vec<f32> = (0..64).map(|n| n as f32).collect();
    let mut sink = vec![0.0f32; 64];
    let mut occupancy = 0usize;
    let mut next_in = 0usize;
    let mut next_out = 0usize;

    // Deterministic mix of write/read sizes that crosses the boundary repeatedly.
    let steps = [(7, 3), (20, 5), (13, 30), (1, 0), (40, 17), (0, 40), (31, 2), (9, 9)];
    for (write_len, read_len) in steps {
        let chunk: Vec<f32> = (0..write_len)
            .map(|i| source[(next_in + i) % source.len()])
            .collect();
        let written = ring.write(&chunk);
        assert_eq!(written, write_len.min(32 - occupancy));
        next_in += written;
        occupancy += written;
        assert_eq!(ring.available_read(), occupancy);

        let read = ring.read(&mut sink[..read_len]);
        assert_eq!(read, read_len.min(occupancy));
        for (i, &value) in sink[..read].iter().enumerate() {
            assert_eq!(value, source[(next_out + i) % source.len()]);
        }
        next_out += read;
        occupancy -= read;

        assert_eq!(ring.available_read(), occupancy);
        assert_eq!(ring.available_write(), 32 - occupancy);
        assert!(occupancy <= ring.capacity());
    }
}

