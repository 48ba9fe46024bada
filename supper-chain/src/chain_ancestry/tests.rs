//! Tests for header chain ancestry lookups.

use color_eyre::eyre::Report;

use crate::work::difficulty::CompactDifficulty;

use super::{generate::*, *};

const BITS: CompactDifficulty = CompactDifficulty(0x1d00ffff);

#[test]
fn ancestors_are_indexed_by_height() -> Result<(), Report> {
    supper_test::init();

    let chain = evenly_spaced_chain(10, 1_000, 600, BITS);

    assert_eq!(chain.len(), 10);
    assert!(!chain.is_empty());
    assert_eq!(chain.tip().height, Height(9));
    assert_eq!(chain.tip().header.block_time(), 1_000 + 9 * 600);

    for height in 0..10 {
        let block = chain.ancestor(Height(height)).expect("height is below the tip");
        assert_eq!(block.height, Height(height));
        assert_eq!(block.hash, fake_hash(Height(height)));
    }

    assert_eq!(chain.ancestor(Height(10)), None);
    assert_eq!(chain.ancestor(Height::MAX), None);

    Ok(())
}

#[test]
fn previous_follows_back_references() {
    supper_test::init();

    let chain = evenly_spaced_chain(3, 0, 600, BITS);

    let tip = chain.tip();
    let parent = chain.previous(tip).expect("tip has a parent");
    assert_eq!(parent.height, Height(1));

    let genesis = chain.previous(parent).expect("block 1 has a parent");
    assert_eq!(genesis.height, Height::MIN);
    assert_eq!(chain.previous(genesis), None);

    // A block from another chain does not link to this one.
    let mut stranger = *tip;
    stranger.header.previous_block_hash = block::Hash([0xff; 32]);
    assert_eq!(chain.previous(&stranger), None);

    // Lookups through a reference use the same implementation.
    let view = &chain;
    assert_eq!(ChainAncestry::tip(&view), tip);
}

#[test]
fn push_rejects_headers_off_the_tip() {
    supper_test::init();

    let mut chain = evenly_spaced_chain(2, 0, 600, BITS);
    let tip_hash = chain.tip().hash;
    let orphan = Header::new(fake_hash(Height(0)), unix_time(1_200), BITS);

    assert_eq!(
        chain.push(fake_hash(Height(2)), orphan),
        Err(ChainError::NotOnTip {
            hash: fake_hash(Height(2)),
            previous_block_hash: fake_hash(Height(0)),
            tip_hash,
        })
    );
    assert_eq!(chain.len(), 2);

    let child = Header::new(tip_hash, unix_time(1_200), BITS);
    let new_tip = chain
        .push(fake_hash(Height(2)), child)
        .expect("header builds on the tip");
    assert_eq!(new_tip.height, Height(2));
    assert_eq!(chain.iter().count(), 3);
}
