use std::io::Cursor;

use crate::dictionary::pos::{PosTag, PosType};
use crate::dictionary::*;
use crate::token::TokenBuf;
use crate::tokenizer::worker::WorkerState;
use crate::tokenizer::*;

const MATRIX_DEF: &str = "1 1\n0 0 0";

const CHAR_DEF: &str = "\
DEFAULT 0 1 0
SPACE 0 1 0
HANGUL 0 1 2
HANJA 0 1 2
SYMBOL 1 1 0
NUMERIC 1 1 0
ALPHA 1 1 0

0x0020 SPACE
0x0021..0x002F SYMBOL
0x0030..0x0039 NUMERIC
0x0041..0x005A ALPHA
0x0061..0x007A ALPHA
0x4E00..0x9FFF HANJA
0xAC00..0xD7A3 HANGUL
0x20000..0x2A6DF HANJA
";

const UNK_DEF: &str = "\
DEFAULT,0,0,3000,SY,*,*,*,*,*,*,*
SPACE,0,0,3000,SP,*,*,*,*,*,*,*
HANGUL,0,0,5000,UNKNOWN,*,*,*,*,*,*,*
HANJA,0,0,4000,SH,*,*,*,*,*,*,*
SYMBOL,0,0,3000,SY,*,*,*,*,*,*,*
NUMERIC,0,0,3000,SN,*,*,*,*,*,*,*
ALPHA,0,0,3000,SL,*,*,*,*,*,*,*";

const LEXICON_CSV: &str = "\
한국,0,0,10,NNP,*,T,한국,*,*,*,*
어,0,0,10,NNG,*,F,어,*,*,*,*
에,0,0,10,JKB,*,F,에,*,*,*,*
도서관,0,0,10,NNG,*,T,도서관,Compound,*,*,도서/NNG/*+관/NNG/*
갔다,0,0,10,VV+EP+EF,*,F,갔다,Inflect,VV,EF,가/VV/*+았/EP/*+다/EF/*";

fn build_dict(lexicon_csv: &str) -> Dictionary {
    SystemDictionaryBuilder::from_readers(
        lexicon_csv.as_bytes(),
        MATRIX_DEF.as_bytes(),
        CHAR_DEF.as_bytes(),
        UNK_DEF.as_bytes(),
    )
    .unwrap()
}

fn tokenize(tokenizer: &Tokenizer, input: &str) -> Vec<TokenBuf> {
    let mut worker = tokenizer.new_worker();
    worker.reset_sentence(input);
    worker.token_bufs().unwrap()
}

fn surfaces(tokens: &[TokenBuf]) -> Vec<&str> {
    tokens.iter().map(|t| t.surface.as_str()).collect()
}

#[test]
fn test_prefers_cheaper_single_word() {
    let tokenizer = Tokenizer::new(build_dict(
        "한,0,0,6,NNG\n국,0,0,6,NNG\n한국,0,0,10,NNP",
    ));
    let tokens = tokenize(&tokenizer, "한국");
    assert_eq!(surfaces(&tokens), ["한국"]);
    assert_eq!(tokens[0].left_pos, PosTag::NNP);
}

#[test]
fn test_prefers_cheaper_split() {
    let tokenizer = Tokenizer::new(build_dict(
        "한,0,0,6,NNG\n국,0,0,6,NNG\n한국,0,0,13,NNP",
    ));
    let tokens = tokenize(&tokenizer, "한국");
    assert_eq!(surfaces(&tokens), ["한", "국"]);
    assert_eq!(tokens[0].range_char, 0..1);
    assert_eq!(tokens[1].range_char, 1..2);
}

#[test]
fn test_connection_costs() {
    // 가 followed by 나 is expensive, so the single word wins despite its own cost.
    let matrix_def = "3 3\n1 1 0\n1 2 5000\n0 1 0\n0 2 0";
    let lexicon_csv = "가,1,1,10,NNG\n나,2,2,10,NNG\n가나,2,2,30,NNG";
    let dict = SystemDictionaryBuilder::from_readers(
        lexicon_csv.as_bytes(),
        matrix_def.as_bytes(),
        CHAR_DEF.as_bytes(),
        UNK_DEF.as_bytes(),
    )
    .unwrap();
    let tokenizer = Tokenizer::new(dict);
    let tokens = tokenize(&tokenizer, "가나");
    assert_eq!(surfaces(&tokens), ["가나"]);
    assert_eq!(tokens[0].left_id, 2);
    assert_eq!(tokens[0].word_cost, 30);
}

#[test]
fn test_ties_keep_first_entry() {
    let tokenizer = Tokenizer::new(build_dict("가,0,0,10,NNG\n가,0,0,10,VV"));
    let tokens = tokenize(&tokenizer, "가");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].left_pos, PosTag::NNG);
}

#[test]
fn test_empty_input() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV));
    let mut worker = tokenizer.new_worker();
    worker.reset_sentence("");
    assert!(worker.next_token().unwrap().is_none());
    assert_eq!(worker.state(), WorkerState::Exhausted);
}

#[test]
fn test_spaces_are_discarded() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV));
    let tokens = tokenize(&tokenizer, "한국  어 ");
    assert_eq!(surfaces(&tokens), ["한국", "어"]);
    assert_eq!(tokens[1].range_char, 4..5);
    assert_eq!(tokens[1].range_byte, 8..11);
}

#[test]
fn test_space_tokens() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV)).discard_punctuation(false);
    let tokens = tokenize(&tokenizer, "한국  어");
    assert_eq!(surfaces(&tokens), ["한국", "  ", "어"]);
    assert_eq!(tokens[1].range_char, 2..4);
    assert_eq!(tokens[1].lex_type, LexType::Unknown);
    assert_eq!(tokens[1].left_pos, PosTag::SP);
}

#[test]
fn test_only_spaces() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV)).discard_punctuation(false);
    let tokens = tokenize(&tokenizer, "   ");
    let text: String = tokens.iter().map(|t| t.surface.as_str()).collect();
    assert_eq!(text, "   ");

    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV));
    assert!(tokenize(&tokenizer, "   ").is_empty());
}

#[test]
fn test_space_penalty() {
    let lexicon_csv = "한국,0,0,10,NNP\n에,0,0,10,JKB\n에,0,0,1000,NNG";
    let tokenizer = Tokenizer::new(build_dict(lexicon_csv));

    let tokens = tokenize(&tokenizer, "한국에");
    assert_eq!(surfaces(&tokens), ["한국", "에"]);
    assert_eq!(tokens[1].left_pos, PosTag::J);

    // A particle right after a space costs more than the noun reading.
    let tokens = tokenize(&tokenizer, "한국 에");
    assert_eq!(surfaces(&tokens), ["한국", "에"]);
    assert_eq!(tokens[1].left_pos, PosTag::NNG);
}

#[test]
fn test_punctuation() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV));
    assert_eq!(surfaces(&tokenize(&tokenizer, "한국!어.")), ["한국", "어"]);

    let tokenizer = tokenizer.discard_punctuation(false);
    let tokens = tokenize(&tokenizer, "한국!어.");
    assert_eq!(surfaces(&tokens), ["한국", "!", "어", "."]);
    assert_eq!(tokens[1].left_pos, PosTag::SY);
}

#[test]
fn test_decompound_none() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV)).decompound_mode(DecompoundMode::None);
    let tokens = tokenize(&tokenizer, "도서관에 갔다");
    assert_eq!(surfaces(&tokens), ["도서관", "에", "갔다"]);
    assert_eq!(tokens[0].pos_type, PosType::Compound);
    assert_eq!(tokens[2].pos_type, PosType::Inflect);
    assert_eq!(tokens[2].left_pos, PosTag::VV);
    assert_eq!(tokens[2].right_pos, PosTag::E);
    assert!(tokens.iter().all(|t| t.position_increment == 1));
    assert!(tokens.iter().all(|t| t.position_length == 1));
}

#[test]
fn test_decompound_discard() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV));
    let tokens = tokenize(&tokenizer, "도서관에 갔다");
    assert_eq!(surfaces(&tokens), ["도서", "관", "에", "가", "았", "다"]);

    assert_eq!(tokens[0].range_char, 0..2);
    assert_eq!(tokens[1].range_char, 2..3);
    assert_eq!(tokens[1].range_byte, 6..9);
    assert_eq!(tokens[0].pos_type, PosType::Morpheme);
    assert_eq!(tokens[0].left_pos, PosTag::NNG);

    // Morphemes of an inflected form share the span of the whole word.
    for t in &tokens[3..] {
        assert_eq!(t.range_char, 5..7);
        assert_eq!(t.position_increment, 1);
        assert_eq!(t.feature, "VV+EP+EF,*,F,갔다,Inflect,VV,EF,가/VV/*+았/EP/*+다/EF/*");
    }
    assert_eq!(tokens[4].left_pos, PosTag::E);
    assert_eq!(tokens[4].reading, None);
}

#[test]
fn test_decompound_mixed() {
    let tokenizer =
        Tokenizer::new(build_dict(LEXICON_CSV)).decompound_mode(DecompoundMode::Mixed);
    let tokens = tokenize(&tokenizer, "도서관에 갔다");
    assert_eq!(
        surfaces(&tokens),
        ["도서관", "도서", "관", "에", "갔다", "가", "았", "다"]
    );

    let increments: Vec<_> = tokens.iter().map(|t| t.position_increment).collect();
    let lengths: Vec<_> = tokens.iter().map(|t| t.position_length).collect();
    assert_eq!(increments, [1, 0, 1, 1, 1, 0, 1, 1]);
    assert_eq!(lengths, [2, 1, 1, 1, 3, 1, 1, 1]);

    // The original word is followed by exactly as many morphemes as it spans.
    let mut i = 0;
    while i < tokens.len() {
        let k = tokens[i].position_length as usize;
        if k > 1 {
            assert_eq!(tokens[i + 1].position_increment, 0);
            assert!(tokens[i + 1..=i + k].iter().all(|t| t.pos_type == PosType::Morpheme));
        }
        i += if k > 1 { k + 1 } else { 1 };
    }
}

#[test]
fn test_unknown_words() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV));
    let tokens = tokenize(&tokenizer, "abc123한글");
    assert_eq!(surfaces(&tokens), ["abc", "123", "한글"]);
    assert!(tokens.iter().all(|t| t.lex_type == LexType::Unknown));
    assert_eq!(tokens[0].left_pos, PosTag::SL);
    assert_eq!(tokens[1].left_pos, PosTag::SN);
    assert_eq!(tokens[2].left_pos, PosTag::UNKNOWN);
}

#[test]
fn test_unknown_unigrams() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV)).output_unknown_unigrams(true);
    let tokens = tokenize(&tokenizer, "abc한국");
    assert_eq!(surfaces(&tokens), ["a", "b", "c", "한국"]);
    assert_eq!(tokens[2].range_char, 2..3);
    assert_eq!(tokens[3].lex_type, LexType::System);
}

#[test]
fn test_unknown_unigrams_punctuation() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV)).output_unknown_unigrams(true);
    assert_eq!(surfaces(&tokenize(&tokenizer, "한국!#어")), ["한국", "어"]);

    let tokenizer = tokenizer.discard_punctuation(false);
    let tokens = tokenize(&tokenizer, "한국!#어");
    assert_eq!(surfaces(&tokens), ["한국", "!", "#", "어"]);
    assert_eq!(tokens[2].range_char, 3..4);
}

#[test]
fn test_astral_chars() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV));
    let tokens = tokenize(&tokenizer, "𠀀𠀁한국");
    assert_eq!(surfaces(&tokens), ["𠀀𠀁", "한국"]);
    assert_eq!(tokens[0].range_char, 0..2);
    assert_eq!(tokens[0].range_byte, 0..8);
    assert_eq!(tokens[0].left_pos, PosTag::SH);
    assert_eq!(tokens[1].range_char, 2..4);
    assert_eq!(tokens[1].range_byte, 8..14);

    let tokenizer = tokenizer.output_unknown_unigrams(true);
    let tokens = tokenize(&tokenizer, "𠀀𠀁");
    assert_eq!(surfaces(&tokens), ["𠀀", "𠀁"]);
    assert_eq!(tokens[1].range_char, 1..2);
    assert_eq!(tokens[1].range_byte, 4..8);
}

#[test]
fn test_offsets_cover_input() {
    let input = "한국 어!  도서관, abc 2024";
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV))
        .decompound_mode(DecompoundMode::None)
        .discard_punctuation(false);
    let tokens = tokenize(&tokenizer, input);

    let text: String = tokens.iter().map(|t| t.surface.as_str()).collect();
    assert_eq!(text, input);

    let mut char_end = 0;
    let mut byte_end = 0;
    for t in &tokens {
        assert_eq!(t.range_char.start, char_end);
        assert_eq!(t.range_byte.start, byte_end);
        assert_eq!(&input[t.range_byte.clone()], t.surface);
        char_end = t.range_char.end;
        byte_end = t.range_byte.end;
    }
    assert_eq!(char_end, input.chars().count());
    assert_eq!(byte_end, input.len());
}

#[test]
fn test_user_lexicon_longest_match() {
    let dict = build_dict("한국,0,0,10,NNP\n어,0,0,10,NNG")
        .reset_user_lexicon_from_reader(Some("한,0,0,10,NNG\n한국어,0,0,10000,NNG".as_bytes()))
        .unwrap();
    let tokenizer = Tokenizer::new(dict);
    let tokens = tokenize(&tokenizer, "한국어");
    assert_eq!(surfaces(&tokens), ["한국어"]);
    assert_eq!(tokens[0].lex_type, LexType::User);
    assert_eq!(tokens[0].word_cost, 10000);
}

#[test]
fn test_user_lexicon_removed() {
    let dict = build_dict("한국,0,0,10,NNP\n어,0,0,10,NNG")
        .reset_user_lexicon_from_reader(Some("한국어,0,0,10,NNG".as_bytes()))
        .unwrap()
        .reset_user_lexicon_from_reader(None::<&[u8]>)
        .unwrap();
    let tokenizer = Tokenizer::new(dict);
    assert_eq!(surfaces(&tokenize(&tokenizer, "한국어")), ["한국", "어"]);
}

#[test]
fn test_deterministic() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV)).decompound_mode(DecompoundMode::Mixed);
    let input = "도서관에 갔다. 한국어 abc";
    let expected = tokenize(&tokenizer, input);
    assert_eq!(tokenize(&tokenizer.clone(), input), expected);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| tokenize(&tokenizer, input)))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_reset_discards_pending() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV));
    let mut worker = tokenizer.new_worker();
    worker.reset_sentence("도서관에 갔다");
    assert_eq!(worker.next_token().unwrap().unwrap().surface(), "도서");

    worker.reset_sentence("한국어");
    assert_eq!(worker.state(), WorkerState::Idle);
    let tokens = worker.token_bufs().unwrap();
    assert_eq!(tokens, tokenize(&tokenizer, "한국어"));

    worker.reset_sentence("한국어");
    assert_eq!(worker.token_bufs().unwrap(), tokens);
}

#[test]
fn test_reader_input() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV));
    let input = "한국어 도서관에 갔다 ".repeat(200);
    let mut worker = tokenizer.new_worker();
    worker.reset_reader(Cursor::new(input.clone().into_bytes()));
    let from_reader = worker.token_bufs().unwrap();
    assert_eq!(from_reader, tokenize(&tokenizer, &input));
    assert_eq!(from_reader.len(), 200 * 8);
    assert_eq!(from_reader.last().unwrap().range_byte.end, input.len() - 1);
}

#[test]
fn test_reader_error() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV));
    let mut bytes = "한국".as_bytes().to_vec();
    bytes.push(0xFF);
    let mut worker = tokenizer.new_worker();
    worker.reset_reader(Cursor::new(bytes));

    assert_eq!(worker.next_token().unwrap().unwrap().surface(), "한국");
    assert!(worker.next_token().is_err());
    assert!(worker.next_token().unwrap().is_none());
}

#[test]
fn test_forced_commit_on_long_ambiguity() {
    // Every position is reachable by two overlapping words, so no boundary is ever unambiguous.
    let tokenizer = Tokenizer::new(build_dict("가,0,0,10,NNG\n가가,0,0,15,NNG"));
    let input = "가".repeat(3000);
    let mut worker = tokenizer.new_worker();
    worker.reset_reader(Cursor::new(input.clone().into_bytes()));
    let tokens = worker.token_bufs().unwrap();

    let mut end = 0;
    for t in &tokens {
        assert_eq!(t.range_char.start, end);
        assert!(t.surface == "가" || t.surface == "가가");
        end = t.range_char.end;
    }
    assert_eq!(end, 3000);
    assert!(tokens.iter().filter(|t| t.surface == "가가").count() >= 1400);
}

#[test]
fn test_long_unknown_run() {
    let tokenizer = Tokenizer::new(build_dict(LEXICON_CSV));
    let input = "a".repeat(2500);
    let tokens = tokenize(&tokenizer, &input);
    let lengths: Vec<_> = tokens.iter().map(|t| t.range_char.len()).collect();
    assert_eq!(lengths, [1024, 1024, 452]);
}

#[test]
fn test_tokenizer_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Tokenizer>();
    assert_send_sync::<Dictionary>();
}
