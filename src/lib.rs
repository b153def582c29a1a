pub mod core;
pub mod analysis;
pub mod query;
pub mod index;
pub mod scoring;
pub mod search;
pub mod parallel;

/*
┌──────────────────────────────────────────────────────────────────────────┐
│                        DOCRANK STRUCT ARCHITECTURE                        │
└──────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────── CORE ──────────────────────────────────┐
│                                                                           │
│  ┌─────────────────────────────────────────────────────────────────┐    │
│  │                      struct SearchServer                         │    │
│  │  ┌───────────────────────────────────────────────────────────┐ │    │
│  │  │ config: SearchConfig          // result cap, epsilon, shards│ │    │
│  │  │ stop_words: StopWordSet       // fixed at construction     │ │    │
│  │  │ store: DocumentStore          // status, rating, id set    │ │    │
│  │  │ index: InvertedIndex          // term→tf and doc→tf maps   │ │    │
│  │  └───────────────────────────────────────────────────────────┘ │    │
│  └─────────────────────────────────────────────────────────────────┘    │
│                                                                           │
│  ┌────────────────┐  ┌───────────────────┐  ┌───────────────────────┐  │
│  │ struct DocId   │  │ enum              │  │ struct Document        │  │
│  │ • 0: i32       │  │ DocumentStatus    │  │ • id: DocId            │  │
│  └────────────────┘  │ • Actual          │  │ • relevance: f64       │  │
│                      │ • Irrelevant      │  │ • rating: i32          │  │
│  ┌────────────────┐  │ • Banned          │  └───────────────────────┘  │
│  │ struct Error   │  │ • Removed         │                              │
│  │ • kind         │  └───────────────────┘  ┌───────────────────────┐  │
│  │ • context      │                         │ struct MatchResult     │  │
│  └────────────────┘                         │ • words: Vec<String>   │  │
│                                             │ • status               │  │
│                                             └───────────────────────┘  │
└───────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── INDEXING ────────────────────────────────┐
│                                                                           │
│  ┌──────────────────────────┐   ┌────────────────────────────────────┐  │
│  │ struct DocumentStore     │   │ struct InvertedIndex               │  │
│  │ • info: BTreeMap<DocId,  │   │ • postings: DashMap<String,        │  │
│  │         DocumentInfo>    │   │     BTreeMap<DocId, f64>>          │  │
│  │ • ids: BTreeSet<DocId>   │   │ • by_doc: BTreeMap<DocId,          │  │
│  └──────────────────────────┘   │     BTreeMap<String, f64>>         │  │
│                                 └────────────────────────────────────┘  │
│  remove_duplicates() groups documents by word set and keeps the          │
│  smallest id per group                                                   │
└───────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────── SEARCH PIPELINE ────────────────────────────┐
│                                                                           │
│  raw text ──> tokenizer ──> query parser ──> scorer ──> ranker           │
│                                                                           │
│  ┌───────────────────┐  ┌──────────────────────┐  ┌──────────────────┐  │
│  │ struct Query<'q>  │  │ trait DocumentFilter │  │ fn rank/rank_par │  │
│  │ • plus_words      │  │ • accept(id, status, │  │ relevance desc,  │  │
│  │ • minus_words     │  │   rating) -> bool    │  │ rating tiebreak  │  │
│  └───────────────────┘  └──────────────────────┘  └──────────────────┘  │
└───────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────── PARALLEL LAYER ──────────────────────────────┐
│                                                                           │
│  ┌────────────────────────────────────┐  ┌───────────────────────────┐  │
│  │ struct ConcurrentMap<K, V>         │  │ fn process_queries        │  │
│  │ • shards: Vec<Mutex<BTreeMap>>     │  │ fn process_queries_joined │  │
│  │ • access() / erase()               │  └───────────────────────────┘  │
│  │ • build_ordinary_map()             │                                  │
│  └────────────────────────────────────┘  rayon drives every parallel    │
│                                          variant; each region is bulk-  │
│  scorer_par accumulates idf·tf into      synchronous with an implicit   │
│  the sharded map, one shard lock per     barrier at its end             │
│  contribution                                                            │
└───────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────── WRAPPERS ───────────────────────────────────┐
│                                                                           │
│  RequestQueue ──wraps──> SearchServer, counts empty results over the     │
│                          last 1440 requests                              │
│  Paginator ──views──> any slice as fixed-size pages                      │
└───────────────────────────────────────────────────────────────────────────┘
*/
